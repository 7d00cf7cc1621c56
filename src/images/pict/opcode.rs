//! PICT opcode table
//!
//! Opcodes the interpreter understands get their own variant; every other
//! value lands in [`Opcode::Other`] and is skipped with [`skip_len`].

use super::state::ShapeFamily;

/// How an opcode's low three bits apply a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMethod {
    Frame,
    Paint,
    Erase,
    Invert,
    Fill,
    Text,
    Undefined,
}

impl DrawMethod {
    /// Classify by the low three bits of an opcode
    pub fn from_opcode(opcode: u16) -> Self {
        match opcode & 0x07 {
            0 => Self::Frame,
            1 => Self::Paint,
            2 => Self::Erase,
            3 => Self::Invert,
            4 => Self::Fill,
            _ => Self::Undefined,
        }
    }
}

/// Operand size of an opcode the interpreter does not implement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipLen {
    /// Exactly this many bytes
    Fixed(usize),
    /// A 16-bit length followed by that many bytes
    Prefixed16,
    /// A 32-bit length followed by that many bytes
    Prefixed32,
}

/// Operand size of an unimplemented opcode, by numeric range.
///
/// Ranges are checked in order and the first match wins.
pub fn skip_len(opcode: u32) -> SkipLen {
    match opcode {
        0x0000..=0x00AF => SkipLen::Prefixed16,
        0x00B0..=0x00CF => SkipLen::Fixed(0),
        0x00D0..=0x00FF => SkipLen::Prefixed32,
        0x0100..=0x01FF => SkipLen::Fixed(2),
        0x0200..=0x0BFE => SkipLen::Fixed(4),
        0x0BFF => SkipLen::Fixed(22),
        0x0C00 => SkipLen::Fixed(24),
        0x0C01..=0x7EFF => SkipLen::Fixed(24),
        0x7F00..=0x7FFF => SkipLen::Fixed(254),
        0x8000..=0x80FF => SkipLen::Fixed(0),
        _ => SkipLen::Prefixed32,
    }
}

/// Operand of an opcode Apple reserves with a known layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedOperand {
    /// Exactly this many bytes
    Fixed(usize),
    /// A 16-bit size that counts itself, as in polygon and region records
    SelfSized,
}

/// Decoded opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Nop,
    Clip,
    BkPat,
    TxFont,
    TxFace,
    TxMode,
    SpExtra,
    PnSize,
    PnMode,
    PnPat,
    FillPat,
    OvSize,
    Origin,
    TxSize,
    FgColor,
    BkColor,
    TxRatio,
    Version,
    BkPixPat,
    PnPixPat,
    FillPixPat,
    PnLocHFrac,
    ChExtra,
    RgbFgCol,
    RgbBkCol,
    HiliteMode,
    HiliteColor,
    DefHilite,
    OpColor,
    Line,
    LineFrom,
    ShortLine,
    ShortLineFrom,
    LongText,
    DhText,
    DvText,
    DhDvText,
    FontName,
    /// Rectangle, round rectangle, oval, arc, polygon and region families
    Shape {
        family: ShapeFamily,
        method: DrawMethod,
        /// Re-use the family's last geometry instead of reading one
        same: bool,
    },
    BitsRect,
    BitsRgn,
    PackBitsRect,
    PackBitsRgn,
    DirectBitsRect,
    DirectBitsRgn,
    ShortComment,
    LongComment,
    EndPic,
    HeaderOp,
    CompressedQuickTime,
    /// Reserved slot whose operand size is fixed by its position
    Reserved {
        code: u16,
        operand: ReservedOperand,
    },
    Other(u16),
}

impl Opcode {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0000 => Self::Nop,
            0x0001 => Self::Clip,
            0x0002 => Self::BkPat,
            0x0003 => Self::TxFont,
            0x0004 => Self::TxFace,
            0x0005 => Self::TxMode,
            0x0006 => Self::SpExtra,
            0x0007 => Self::PnSize,
            0x0008 => Self::PnMode,
            0x0009 => Self::PnPat,
            0x000A => Self::FillPat,
            0x000B => Self::OvSize,
            0x000C => Self::Origin,
            0x000D => Self::TxSize,
            0x000E => Self::FgColor,
            0x000F => Self::BkColor,
            0x0010 => Self::TxRatio,
            0x0011 => Self::Version,
            0x0012 => Self::BkPixPat,
            0x0013 => Self::PnPixPat,
            0x0014 => Self::FillPixPat,
            0x0015 => Self::PnLocHFrac,
            0x0016 => Self::ChExtra,
            0x0017..=0x0019 => Self::Reserved {
                code: value,
                operand: ReservedOperand::Fixed(0),
            },
            0x001A => Self::RgbFgCol,
            0x001B => Self::RgbBkCol,
            0x001C => Self::HiliteMode,
            0x001D => Self::HiliteColor,
            0x001E => Self::DefHilite,
            0x001F => Self::OpColor,
            0x0020 => Self::Line,
            0x0021 => Self::LineFrom,
            0x0022 => Self::ShortLine,
            0x0023 => Self::ShortLineFrom,
            0x0028 => Self::LongText,
            0x0029 => Self::DhText,
            0x002A => Self::DvText,
            0x002B => Self::DhDvText,
            0x002C => Self::FontName,
            0x0030..=0x008F if value & 0x07 <= 4 => {
                let family = match (value - 0x30) >> 4 {
                    0 => ShapeFamily::Rect,
                    1 => ShapeFamily::RRect,
                    2 => ShapeFamily::Oval,
                    3 => ShapeFamily::Arc,
                    4 => ShapeFamily::Poly,
                    _ => ShapeFamily::Region,
                };
                Self::Shape {
                    family,
                    method: DrawMethod::from_opcode(value),
                    same: value & 0x08 != 0,
                }
            },
            // shape slots with drawing verbs 5 to 7: operands as the family's
            // non-"same" form, or none at all for the "same" form
            0x0030..=0x008F => {
                let operand = match (value >> 4, value & 0x08 != 0) {
                    (0x3, false) | (0x4, false) | (0x5, false) => ReservedOperand::Fixed(8),
                    (0x6, false) => ReservedOperand::Fixed(12),
                    (0x6, true) => ReservedOperand::Fixed(4),
                    (0x7, false) | (0x8, false) => ReservedOperand::SelfSized,
                    _ => ReservedOperand::Fixed(0),
                };
                Self::Reserved {
                    code: value,
                    operand,
                }
            },
            0x0090 => Self::BitsRect,
            0x0091 => Self::BitsRgn,
            0x0098 => Self::PackBitsRect,
            0x0099 => Self::PackBitsRgn,
            0x009A => Self::DirectBitsRect,
            0x009B => Self::DirectBitsRgn,
            0x00A0 => Self::ShortComment,
            0x00A1 => Self::LongComment,
            0x00FF => Self::EndPic,
            0x0C00 => Self::HeaderOp,
            0x8200 => Self::CompressedQuickTime,
            other => Self::Other(other),
        }
    }
}
