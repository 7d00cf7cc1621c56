//! Command-line tool for converting Macintosh PICT files to SVG.
//!
//! # Usage
//!
//! Basic conversion:
//! ```sh
//! cargo run --example pict_to_svg -- drawing.pict -o drawing.svg
//! ```
//!
//! Print the decoded events instead of writing SVG:
//! ```sh
//! cargo run --example pict_to_svg -- drawing.pict --events
//! ```
//!
//! Place the picture on a page:
//! ```sh
//! cargo run --example pict_to_svg -- drawing.pict -o out.svg --page-x 72 --page-y 72
//! ```

use clap::Parser;
use quickpict::images::pict::{
    DrawEvent, EventRecorder, ParseOptions, PictParser, Point, SvgOptions, SvgSink,
};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert a QuickDraw picture to SVG
#[derive(Parser, Debug)]
#[command(
    name = "pict_to_svg",
    about = "Convert Macintosh PICT pictures to SVG",
    version
)]
struct Args {
    /// Input PICT file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output SVG file (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Largest output width
    #[arg(long, default_value_t = 768.0)]
    max_width: f64,

    /// Largest output height
    #[arg(long, default_value_t = 512.0)]
    max_height: f64,

    /// Leave raster images out of the SVG
    #[arg(long)]
    no_rasters: bool,

    /// Page position of the picture's left edge
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    page_x: i32,

    /// Page position of the picture's top edge
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    page_y: i32,

    /// Fail on the first damaged record instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Print the decoded event list instead of SVG
    #[arg(long)]
    events: bool,
}

fn print_events(events: &[DrawEvent]) {
    for (i, event) in events.iter().enumerate() {
        match event {
            DrawEvent::BeginDocument { page } => println!("{:4} page {:?}", i, page),
            DrawEvent::SetStyle(style) => println!("{:4} style {:?}", i, style.method),
            DrawEvent::SetFont(font) => println!(
                "{:4} font {} {:?} {}pt",
                i,
                font.id,
                font.name.as_deref().unwrap_or("?"),
                font.size
            ),
            DrawEvent::Shape { shape, style } => println!(
                "{:4} {:?} {:?} {:?}",
                i,
                style.method,
                shape.kind(),
                shape.bounds()
            ),
            DrawEvent::Text { run, .. } => {
                println!("{:4} text {:?} at {:?}", i, run.text, run.position)
            },
            DrawEvent::Raster(image) => println!(
                "{:4} raster {:?} {:?} at {:?}",
                i,
                image.data.format(),
                image.data.dimensions(),
                image.placement
            ),
            DrawEvent::Comment { kind, data } => {
                println!("{:4} comment {} ({} bytes)", i, kind, data.len())
            },
        }
    }
}

fn run(args: &Args) -> quickpict::Result<()> {
    let data = fs::read(&args.input)?;
    let options = ParseOptions {
        page_origin: Point::new(args.page_x, args.page_y),
        strict: args.strict,
        ..ParseOptions::default()
    };
    let mut parser = PictParser::new(&data, options)?;
    let header = parser.header();
    eprintln!(
        "{}: {:?}, {}x{}",
        args.input.display(),
        header.version,
        header.width(),
        header.height()
    );

    let summary = if args.events {
        let mut recorder = EventRecorder::new();
        let summary = parser.run(&mut recorder)?;
        print_events(&recorder.events);
        summary
    } else {
        let mut sink = SvgSink::new(SvgOptions {
            max_width: args.max_width,
            max_height: args.max_height,
            embed_rasters: !args.no_rasters,
        });
        let summary = parser.run(&mut sink)?;
        let svg = sink.finish();
        match &args.output {
            Some(path) => fs::write(path, svg)?,
            None => println!("{}", svg),
        }
        summary
    };

    eprintln!(
        "{} opcodes, {} records skipped{}",
        summary.opcodes,
        summary.skipped_records,
        if summary.stopped_early {
            ", stopped early"
        } else {
            ""
        }
    );
    if let Some(err) = &summary.last_error {
        eprintln!("last error: {}", err);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        },
    }
}
