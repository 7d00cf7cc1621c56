// PICT header detection and opcode interpreter
//
// Finds the picture header (at offset 0, or after a 512-byte preamble), then
// walks the opcode stream, updating the drawing state and handing primitives
// to a PictSink.

use super::bitmap::Bitmap;
use super::error::{PictError, PictResult};
use super::geometry::{arc_angles, arc_bounds};
use super::opcode::{DrawMethod, Opcode, ReservedOperand, SkipLen, skip_len};
use super::pattern::Pattern;
use super::pixmap::{PIXMAP_ROW_FLAG, PixelData, Pixmap, PixmapLayout};
use super::region::Region;
use super::sink::{
    FontInfo, PictSink, RasterData, RasterImage, Shape, Style, TextRun,
};
use super::state::{DrawingState, Polygon, ShapeFamily, ShapeGeometry};
use super::stream::PictStream;
use super::types::{Bounds, FontStyle, PictRect, Point, PointF, Rgb};
use crate::common::error::Result;
use encoding_rs::MACINTOSH;
use memchr::memmem;
use tracing::{debug, trace, warn};

/// Offsets tried for the picture header
const HEADER_SLOTS: [usize; 2] = [0, 512];

/// Version 1: `picVersion` opcode 0x11 with version 1
const V1_MARKER: u16 = 0x1101;

/// Version 2: `Version` opcode, version word, then `HeaderOp`
const V2_VERSION_OP: u16 = 0x0011;
const V2_VERSION: u16 = 0x02FF;
const HEADER_OP: u16 = 0x0C00;
const HEADER_OP_SIZE: usize = 24;

/// Extended version 2 header (`-2`) carries resolution and an integer box
const EXTENDED_V2: i16 = -2;

/// Offset of `srcRect` in a compressed QuickTime record: version, matrix,
/// matte size, matte rect and mode come first
const QUICKTIME_SRC_RECT: usize = 2 + 36 + 4 + 8 + 2;

/// JPEG start-of-image marker
const JPEG_SOI: &[u8] = &[0xFF, 0xD8, 0xFF];

/// PICT file version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictVersion {
    /// Version 1: one-byte opcodes
    V1,
    /// Version 2: two-byte opcodes, operands padded to even length
    V2,
}

/// PICT file header
#[derive(Debug, Clone, PartialEq)]
pub struct PictHeader {
    pub version: PictVersion,
    /// Picture frame
    pub frame: PictRect,
    /// Where the picture starts in the input (0, or 512 after a preamble)
    pub offset: usize,
    /// Position of the first opcode
    pub data_start: usize,
    /// Horizontal and vertical resolution from an extended version 2 header
    pub resolution: Option<(f64, f64)>,
    /// Bounding box from the version 2 header record
    pub source_bounds: Option<Bounds>,
}

impl PictHeader {
    /// Locate and parse the header.
    pub fn detect(data: &[u8]) -> PictResult<Self> {
        HEADER_SLOTS
            .iter()
            .find_map(|&slot| Self::parse_at(data, slot).ok().flatten())
            .ok_or(PictError::HeaderMismatch)
    }

    fn parse_at(data: &[u8], slot: usize) -> PictResult<Option<Self>> {
        let mut stream = PictStream::new(data);
        stream.seek(slot)?;
        stream.check(12)?;
        let _pic_size = stream.read_u16()?;
        let frame = stream.read_rect()?;

        let header = match stream.read_u16()? {
            V1_MARKER => Self {
                version: PictVersion::V1,
                frame,
                offset: slot,
                data_start: stream.pos(),
                resolution: None,
                source_bounds: None,
            },
            V2_VERSION_OP => {
                stream.check(4 + HEADER_OP_SIZE)?;
                if stream.read_u16()? != V2_VERSION || stream.read_u16()? != HEADER_OP {
                    return Ok(None);
                }
                let sub_version = stream.read_i16()?;
                let _reserved = stream.read_u16()?;
                let (resolution, source_bounds) = if sub_version == EXTENDED_V2 {
                    let h_res = stream.read_fixed()?;
                    let v_res = stream.read_fixed()?;
                    let rect = stream.read_rect()?;
                    stream.skip(4)?;
                    (Some((h_res, v_res)), Some(rect.to_bounds()))
                } else {
                    let top = stream.read_fixed()?;
                    let left = stream.read_fixed()?;
                    let bottom = stream.read_fixed()?;
                    let right = stream.read_fixed()?;
                    stream.skip(4)?;
                    (None, Some(Bounds::new(left, top, right, bottom)))
                };
                Self {
                    version: PictVersion::V2,
                    frame,
                    offset: slot,
                    data_start: stream.pos(),
                    resolution,
                    source_bounds,
                }
            },
            _ => return Ok(None),
        };
        Ok(Some(header))
    }

    /// Get width of the picture
    pub fn width(&self) -> i32 {
        self.frame.width()
    }

    /// Get height of the picture
    pub fn height(&self) -> i32 {
        self.frame.height()
    }
}

/// Interpreter options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Page position of the picture frame's top-left corner
    pub page_origin: Point,
    /// Stop after this many opcodes
    pub max_opcodes: usize,
    /// Return the first recoverable error instead of recovering from it
    pub strict: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            page_origin: Point::default(),
            max_opcodes: 1_000_000,
            strict: false,
        }
    }
}

/// What happened during [`PictParser::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct ParseSummary {
    pub version: PictVersion,
    pub frame: PictRect,
    /// Opcodes read, including the end-of-picture opcode
    pub opcodes: usize,
    /// Records dropped after their bytes were consumed
    pub skipped_records: usize,
    /// The loop ended before an end-of-picture opcode
    pub stopped_early: bool,
    pub reached_end: bool,
    pub last_error: Option<PictError>,
}

/// Result of one opcode
enum Outcome {
    Continue,
    EndOfPicture,
}

/// Failure of one opcode.
///
/// `Skip` means the record was consumed and can be dropped; `Stop` means the
/// cursor can no longer be trusted.
enum OpcodeError {
    Skip(PictError),
    Stop(PictError),
}

impl From<PictError> for OpcodeError {
    fn from(err: PictError) -> Self {
        OpcodeError::Stop(err)
    }
}

type OpResult = std::result::Result<Outcome, OpcodeError>;

/// Error from a reader that leaves the cursor after the record unless the
/// input ran out.
fn record_error(err: PictError) -> OpcodeError {
    match err {
        PictError::TruncatedInput { .. } => OpcodeError::Stop(err),
        _ => OpcodeError::Skip(err),
    }
}

/// PICT opcode interpreter
pub struct PictParser<'data> {
    header: PictHeader,
    stream: PictStream<'data>,
    state: DrawingState,
    options: ParseOptions,
    last_style: Option<Style>,
    last_font: Option<FontInfo>,
}

impl<'data> PictParser<'data> {
    /// Detect the header; only a missing header is an error here.
    pub fn new(data: &'data [u8], options: ParseOptions) -> Result<Self> {
        let header = PictHeader::detect(data)?;
        debug!(
            version = ?header.version,
            offset = header.offset,
            frame = ?header.frame,
            resolution = ?header.resolution,
            "PICT header"
        );
        let mut stream = PictStream::new(data);
        stream.seek(header.data_start)?;
        let state = DrawingState::new(header.version, header.frame, options.page_origin);
        Ok(Self {
            header,
            stream,
            state,
            options,
            last_style: None,
            last_font: None,
        })
    }

    pub fn header(&self) -> &PictHeader {
        &self.header
    }

    /// Drawing state as left by the last run
    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// Interpret the whole picture, sending primitives to `sink`.
    ///
    /// Errors inside records are recovered from: a consumed but undecodable
    /// record is dropped, a read that runs past the input ends the loop and
    /// keeps what was drawn. Both are reported in the [`ParseSummary`]. With
    /// [`ParseOptions::strict`] the first such error is returned instead.
    pub fn run<S: PictSink + ?Sized>(&mut self, sink: &mut S) -> Result<ParseSummary> {
        self.state = DrawingState::new(
            self.header.version,
            self.header.frame,
            self.options.page_origin,
        );
        self.stream.seek(self.header.data_start)?;
        self.last_style = None;
        self.last_font = None;

        let mut summary = ParseSummary {
            version: self.header.version,
            frame: self.header.frame,
            opcodes: 0,
            skipped_records: 0,
            stopped_early: false,
            reached_end: false,
            last_error: None,
        };

        sink.begin_document(self.state.page());

        loop {
            if summary.opcodes >= self.options.max_opcodes {
                warn!(max_opcodes = self.options.max_opcodes, "opcode limit reached");
                summary.stopped_early = true;
                break;
            }
            if self.header.version == PictVersion::V2 {
                self.stream.align_even(self.header.offset);
            }
            if self.stream.is_at_end() {
                warn!("picture ends without an end-of-picture opcode");
                summary.stopped_early = true;
                break;
            }

            let offset = self.stream.pos();
            let code = match self.header.version {
                PictVersion::V1 => self.stream.read_u8().map(u16::from),
                PictVersion::V2 => self.stream.read_u16(),
            };
            let code = match code {
                Ok(code) => code,
                Err(err) => {
                    warn!(offset, %err, "truncated opcode");
                    if self.options.strict {
                        return Err(err.into());
                    }
                    summary.stopped_early = true;
                    summary.last_error = Some(err);
                    break;
                },
            };
            summary.opcodes += 1;
            let opcode = Opcode::from_u16(code);
            trace!(offset, code, ?opcode, "opcode");

            match self.dispatch(opcode, sink) {
                Ok(Outcome::Continue) => {},
                Ok(Outcome::EndOfPicture) => {
                    summary.reached_end = true;
                    break;
                },
                Err(OpcodeError::Skip(err)) => {
                    warn!(offset, code, %err, "skipping record");
                    if self.options.strict {
                        return Err(err.into());
                    }
                    summary.skipped_records += 1;
                    summary.last_error = Some(err);
                },
                Err(OpcodeError::Stop(err)) => {
                    warn!(offset, code, %err, "stopping; keeping what was drawn so far");
                    if self.options.strict {
                        return Err(err.into());
                    }
                    summary.stopped_early = true;
                    summary.last_error = Some(err);
                    break;
                },
            }
        }

        Ok(summary)
    }

    fn dispatch<S: PictSink + ?Sized>(&mut self, opcode: Opcode, sink: &mut S) -> OpResult {
        let st = &mut self.stream;
        match opcode {
            Opcode::Nop => {},
            Opcode::Clip => {
                let clip = Region::parse(st).map_err(record_error)?;
                self.state.clip = Some(clip);
            },
            Opcode::BkPat => self.state.bg_pattern = Pattern::parse_mono(st)?,
            Opcode::PnPat => self.state.pen_pattern = Pattern::parse_mono(st)?,
            Opcode::FillPat => self.state.fill_pattern = Pattern::parse_mono(st)?,
            Opcode::BkPixPat => self.state.bg_pattern = Pattern::parse_pix_pat(st)?,
            Opcode::PnPixPat => self.state.pen_pattern = Pattern::parse_pix_pat(st)?,
            Opcode::FillPixPat => self.state.fill_pattern = Pattern::parse_pix_pat(st)?,
            Opcode::TxFont => self.state.font.id = st.read_u16()?,
            Opcode::TxFace => self.state.font.style = FontStyle::from_bits_truncate(st.read_u8()?),
            Opcode::TxMode => self.state.text_mode = st.read_u16()?,
            Opcode::SpExtra => self.state.font.space_extra = st.read_fixed()?,
            Opcode::PnSize => self.state.pen_size = st.read_point()?,
            Opcode::PnMode => self.state.pen_mode = st.read_u16()?,
            Opcode::OvSize => self.state.oval_size = st.read_point()?,
            Opcode::Origin => {
                st.check(4)?;
                let dh = st.read_i16()?;
                let dv = st.read_i16()?;
                self.state.origin = self.state.origin.offset(i32::from(dh), i32::from(dv));
            },
            Opcode::TxSize => self.state.font.size = st.read_u16()?,
            Opcode::FgColor | Opcode::BkColor => {
                let value = st.read_u32()?;
                match Rgb::from_old_color(value) {
                    Some(color) if opcode == Opcode::FgColor => self.state.fg_color = color,
                    Some(color) => self.state.bg_color = color,
                    None => debug!(value, "unknown QuickDraw colour constant"),
                }
            },
            Opcode::TxRatio => {
                st.check(8)?;
                let numer = st.read_point()?;
                let denom = st.read_point()?;
                self.state.font.ratio = (numer, denom);
            },
            Opcode::Version => match self.header.version {
                PictVersion::V1 => st.skip(1)?,
                PictVersion::V2 => st.skip(2)?,
            },
            Opcode::PnLocHFrac => st.skip(2)?,
            Opcode::ChExtra => self.state.font.char_extra = st.read_i16()?,
            Opcode::RgbFgCol => self.state.fg_color = st.read_rgb()?,
            Opcode::RgbBkCol => self.state.bg_color = st.read_rgb()?,
            Opcode::HiliteColor => self.state.hilite_color = st.read_rgb()?,
            Opcode::OpColor => self.state.op_color = st.read_rgb()?,
            Opcode::HiliteMode => self.state.hilite = true,
            Opcode::DefHilite => {
                self.state.hilite_color = super::state::DEFAULT_HILITE_COLOR;
            },
            Opcode::Line => {
                st.check(8)?;
                let from = st.read_point()?;
                let to = st.read_point()?;
                self.line(from, to, sink);
            },
            Opcode::LineFrom => {
                let to = st.read_point()?;
                self.line(self.state.pen_pos, to, sink);
            },
            Opcode::ShortLine => {
                st.check(6)?;
                let from = st.read_point()?;
                let dh = st.read_i8()?;
                let dv = st.read_i8()?;
                self.line(from, from.offset(i32::from(dh), i32::from(dv)), sink);
            },
            Opcode::ShortLineFrom => {
                st.check(2)?;
                let dh = st.read_i8()?;
                let dv = st.read_i8()?;
                let from = self.state.pen_pos;
                self.line(from, from.offset(i32::from(dh), i32::from(dv)), sink);
            },
            Opcode::LongText => {
                st.check(5)?;
                let at = st.read_point()?;
                let bytes = read_text(st)?;
                self.text(at, bytes, sink);
            },
            Opcode::DhText => {
                st.check(2)?;
                let dh = st.read_u8()?;
                let bytes = read_text(st)?;
                let at = self.state.text_pos.offset(i32::from(dh), 0);
                self.text(at, bytes, sink);
            },
            Opcode::DvText => {
                st.check(2)?;
                let dv = st.read_u8()?;
                let bytes = read_text(st)?;
                let at = self.state.text_pos.offset(0, i32::from(dv));
                self.text(at, bytes, sink);
            },
            Opcode::DhDvText => {
                st.check(3)?;
                let dh = st.read_u8()?;
                let dv = st.read_u8()?;
                let bytes = read_text(st)?;
                let at = self.state.text_pos.offset(i32::from(dh), i32::from(dv));
                self.text(at, bytes, sink);
            },
            Opcode::FontName => self.font_name()?,
            Opcode::Shape {
                family,
                method,
                same,
            } => return self.shape(family, method, same, sink),
            Opcode::BitsRect => return self.bits(false, false, sink),
            Opcode::BitsRgn => return self.bits(false, true, sink),
            Opcode::PackBitsRect => return self.bits(true, false, sink),
            Opcode::PackBitsRgn => return self.bits(true, true, sink),
            Opcode::DirectBitsRect => return self.direct_bits(false, sink),
            Opcode::DirectBitsRgn => return self.direct_bits(true, sink),
            Opcode::ShortComment => {
                let kind = st.read_u16()?;
                debug!(kind, "picture comment");
                sink.comment(kind, &[]);
            },
            Opcode::LongComment => {
                st.check(4)?;
                let kind = st.read_u16()?;
                let len = st.read_u16()? as usize;
                let data = st.read_bytes(len)?;
                debug!(kind, len, "picture comment");
                sink.comment(kind, data);
            },
            Opcode::EndPic => return Ok(Outcome::EndOfPicture),
            Opcode::HeaderOp => st.skip(HEADER_OP_SIZE)?,
            Opcode::CompressedQuickTime => self.quicktime(sink)?,
            Opcode::Reserved { code, operand } => {
                let len = match operand {
                    ReservedOperand::Fixed(n) => n,
                    ReservedOperand::SelfSized => {
                        let size = st.peek_u16()? as usize;
                        size.max(2)
                    },
                };
                trace!(code, len, "skipping reserved opcode");
                st.skip(len)?;
            },
            Opcode::Other(code) => self.skip_unknown(code)?,
        }
        Ok(Outcome::Continue)
    }

    fn skip_unknown(&mut self, code: u16) -> PictResult<()> {
        let len = match skip_len(u32::from(code)) {
            SkipLen::Fixed(n) => n,
            SkipLen::Prefixed16 => self.stream.read_u16()? as usize,
            SkipLen::Prefixed32 => self.stream.read_u32()? as usize,
        };
        trace!(code, len, "skipping opcode");
        self.stream.skip(len)
    }

    fn font_name(&mut self) -> PictResult<()> {
        let len = self.stream.read_u16()? as usize;
        let mut record = PictStream::new(self.stream.read_bytes(len)?);
        let (Ok(id), Ok(name_len)) = (record.read_u16(), record.read_u8()) else {
            debug!(len, "font name record too short");
            return Ok(());
        };
        let name_len = usize::from(name_len).min(record.remaining());
        let name = MACINTOSH
            .decode_without_bom_handling(record.read_bytes(name_len)?)
            .0
            .into_owned();
        debug!(id, name = %name, "font name");
        self.state.font_names.insert(id, name);
        Ok(())
    }

    fn read_shape_rect(&mut self) -> std::result::Result<PictRect, OpcodeError> {
        let rect = self.stream.read_rect()?;
        if !rect.is_valid() {
            return Err(OpcodeError::Skip(PictError::MalformedGeometry(format!(
                "shape rectangle {:?} is empty",
                rect
            ))));
        }
        Ok(rect)
    }

    fn shape<S: PictSink + ?Sized>(
        &mut self,
        family: ShapeFamily,
        method: DrawMethod,
        same: bool,
        sink: &mut S,
    ) -> OpResult {
        let geometry = if same {
            if family == ShapeFamily::Arc {
                self.stream.check(4)?;
                let start = self.stream.read_i16()?;
                let delta = self.stream.read_i16()?;
                match self.state.last_shapes.last(ShapeFamily::Arc) {
                    Some(ShapeGeometry::Arc { rect, .. }) => ShapeGeometry::Arc {
                        rect: *rect,
                        start,
                        delta,
                    },
                    _ => {
                        debug!("same-arc opcode without a previous arc");
                        return Ok(Outcome::Continue);
                    },
                }
            } else {
                match self.state.last_shapes.last(family) {
                    Some(geometry) => geometry.clone(),
                    None => {
                        debug!(?family, "same-shape opcode without a previous shape");
                        return Ok(Outcome::Continue);
                    },
                }
            }
        } else {
            match family {
                ShapeFamily::Rect => ShapeGeometry::Rect(self.read_shape_rect()?),
                ShapeFamily::RRect => ShapeGeometry::RRect(self.read_shape_rect()?),
                ShapeFamily::Oval => ShapeGeometry::Oval(self.read_shape_rect()?),
                ShapeFamily::Arc => {
                    self.stream.check(12)?;
                    let rect = self.read_shape_rect();
                    let start = self.stream.read_i16()?;
                    let delta = self.stream.read_i16()?;
                    ShapeGeometry::Arc {
                        rect: rect?,
                        start,
                        delta,
                    }
                },
                ShapeFamily::Poly => {
                    ShapeGeometry::Poly(Polygon::parse(&mut self.stream).map_err(record_error)?)
                },
                ShapeFamily::Region => {
                    ShapeGeometry::Region(Region::parse(&mut self.stream).map_err(record_error)?)
                },
            }
        };

        let shape = self.page_shape(&geometry, method);
        self.state.last_shapes.remember(geometry);
        if self.state.is_visible(method) {
            self.emit_shape(&shape, method, sink);
        }
        Ok(Outcome::Continue)
    }

    fn page_shape(&self, geometry: &ShapeGeometry, method: DrawMethod) -> Shape {
        let st = &self.state;
        match geometry {
            ShapeGeometry::Rect(rect) => Shape::Rect(st.rect_to_page(rect)),
            ShapeGeometry::RRect(rect) => Shape::RoundRect {
                bounds: st.rect_to_page(rect),
                radius: PointF::new(
                    f64::from(st.oval_size.x) / 2.0,
                    f64::from(st.oval_size.y) / 2.0,
                ),
            },
            ShapeGeometry::Oval(rect) => Shape::Oval(st.rect_to_page(rect)),
            ShapeGeometry::Arc { rect, start, delta } => {
                let oval = st.rect_to_page(rect);
                let (start_angle, end_angle) = arc_angles(*start, *delta);
                if method == DrawMethod::Frame {
                    Shape::Arc {
                        oval,
                        start_angle,
                        end_angle,
                        bounds: arc_bounds(&oval, start_angle, end_angle, false),
                    }
                } else {
                    Shape::Pie {
                        oval,
                        start_angle,
                        end_angle,
                        bounds: arc_bounds(&oval, start_angle, end_angle, true),
                    }
                }
            },
            ShapeGeometry::Poly(poly) => Shape::Polygon {
                points: poly.points.iter().map(|&p| st.to_page(p)).collect(),
            },
            ShapeGeometry::Region(region) => Shape::Region {
                bounds: st.rect_to_page(&region.bbox),
                points: region.points.iter().map(|&p| st.to_page(p)).collect(),
            },
        }
    }

    fn update_style<S: PictSink + ?Sized>(&mut self, style: &Style, sink: &mut S) {
        if self.last_style.as_ref() != Some(style) {
            sink.set_style(style);
            self.last_style = Some(style.clone());
        }
    }

    fn emit_shape<S: PictSink + ?Sized>(&mut self, shape: &Shape, method: DrawMethod, sink: &mut S) {
        let style = self.state.style(method);
        self.update_style(&style, sink);
        sink.draw_shape(shape, &style);
    }

    fn line<S: PictSink + ?Sized>(&mut self, from: Point, to: Point, sink: &mut S) {
        self.state.pen_pos = to;
        if self.state.is_visible(DrawMethod::Frame) {
            let shape = Shape::Line {
                from: self.state.to_page(from),
                to: self.state.to_page(to),
            };
            self.emit_shape(&shape, DrawMethod::Frame, sink);
        }
    }

    fn text<S: PictSink + ?Sized>(&mut self, at: Point, bytes: &[u8], sink: &mut S) {
        self.state.text_pos = at;
        if !self.state.is_visible(DrawMethod::Text) {
            return;
        }
        let font = self.state.font_info();
        if self.last_font.as_ref() != Some(&font) {
            sink.set_font(&font);
            self.last_font = Some(font);
        }
        let style = self.state.style(DrawMethod::Text);
        self.update_style(&style, sink);
        let (text, _) = MACINTOSH.decode_without_bom_handling(bytes);
        let run = TextRun {
            text: text.into_owned(),
            position: self.state.to_page(at),
        };
        sink.draw_text(&run, &style);
    }

    fn bits<S: PictSink + ?Sized>(&mut self, packed: bool, has_region: bool, sink: &mut S) -> OpResult {
        let row_word = self.stream.peek_u16()?;
        if row_word & PIXMAP_ROW_FLAG != 0 {
            self.stream.skip(2)?;
            let layout = PixmapLayout::indexed(packed, has_region);
            let raw = Pixmap::read(&mut self.stream, row_word, layout)?;
            let pixmap = raw.decode().map_err(OpcodeError::Skip)?;
            self.emit_pixmap(pixmap, sink);
        } else {
            let raw = Bitmap::read(&mut self.stream, packed, has_region)?;
            let bitmap = raw.decode().map_err(OpcodeError::Skip)?;
            let image = RasterImage {
                data: RasterData::Mono {
                    width: bitmap.width(),
                    height: bitmap.height(),
                    row_bytes: bitmap.row_bytes,
                    bits: bitmap.data,
                    palette: [self.state.bg_color, self.state.fg_color],
                },
                placement: self.state.rect_to_page(&bitmap.dst_rect),
                src_rect: Some(bitmap.src_rect),
                mode: bitmap.mode,
                mask: bitmap.region,
            };
            sink.draw_raster(&image);
        }
        Ok(Outcome::Continue)
    }

    fn direct_bits<S: PictSink + ?Sized>(&mut self, has_region: bool, sink: &mut S) -> OpResult {
        self.stream.check(6)?;
        let _base_addr = self.stream.read_u32()?;
        let row_word = self.stream.read_u16()?;
        let raw = Pixmap::read(&mut self.stream, row_word, PixmapLayout::direct(has_region))?;
        let pixmap = raw.decode().map_err(OpcodeError::Skip)?;
        self.emit_pixmap(pixmap, sink);
        Ok(Outcome::Continue)
    }

    fn emit_pixmap<S: PictSink + ?Sized>(&mut self, pixmap: Pixmap, sink: &mut S) {
        let (width, height) = (pixmap.width(), pixmap.height());
        let data = match pixmap.pixels {
            PixelData::Indexed {
                indices,
                color_table,
            } => RasterData::Indexed {
                width,
                height,
                indices,
                palette: color_table.colors,
            },
            PixelData::Rgb(pixels) => RasterData::Rgb {
                width,
                height,
                pixels,
            },
        };
        let dst = pixmap.dst_rect.unwrap_or(pixmap.header.bounds);
        let image = RasterImage {
            data,
            placement: self.state.rect_to_page(&dst),
            src_rect: pixmap.src_rect,
            mode: pixmap.mode,
            mask: pixmap.region,
        };
        sink.draw_raster(&image);
    }

    fn quicktime<S: PictSink + ?Sized>(&mut self, sink: &mut S) -> PictResult<()> {
        let len = self.stream.read_u32()? as usize;
        let body = self.stream.read_bytes(len)?;
        let mut record = PictStream::new(body);
        let src_rect = match record.seek(QUICKTIME_SRC_RECT) {
            Ok(()) => record.read_rect(),
            Err(err) => Err(err),
        };
        let Ok(src_rect) = src_rect else {
            debug!(len, "QuickTime record too short for its header");
            return Ok(());
        };
        let search_from = record.pos();
        let Some(start) = memmem::find(&body[search_from..], JPEG_SOI) else {
            debug!(len, "QuickTime record without JPEG data");
            return Ok(());
        };
        debug!(len, jpeg_offset = search_from + start, "QuickTime JPEG");
        let image = RasterImage {
            data: RasterData::Jpeg(body[search_from + start..].to_vec()),
            placement: self.state.rect_to_page(&src_rect),
            src_rect: Some(src_rect),
            mode: 0,
            mask: None,
        };
        sink.draw_raster(&image);
        Ok(())
    }
}

/// Count byte plus that many text bytes
fn read_text<'data>(stream: &mut PictStream<'data>) -> PictResult<&'data [u8]> {
    let count = stream.read_u8()?;
    stream.read_bytes(usize::from(count))
}
