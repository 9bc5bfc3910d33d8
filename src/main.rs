use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use tensorspace_lib::{load_space, Element, ElementKind, Space};

#[derive(Parser)]
#[command(author, version, about = "Inspect strided tensor space layouts")]
struct Cli {
    /// RON layout document, *eg.* (dimensions: [3, 4], axis_order: Some([1, 0]))
    layout: Option<PathBuf>,

    /// Dimensions, used when no layout file is given
    #[arg(long, value_delimiter = ',')]
    dims: Vec<usize>,

    /// Axis order from slowest to fastest varying
    #[arg(long, value_delimiter = ',')]
    order: Option<Vec<usize>>,

    /// Element kind (f64, f32, i32, u32, i16, u16, i8, u8)
    #[arg(long)]
    kind: Option<ElementKind>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt_layer).init();
}

fn resolve_space(cli: &Cli) -> Result<Space> {
    match &cli.layout {
        Some(path) => load_space(path),
        None if cli.dims.is_empty() => bail!("give either a layout file or --dims"),
        None => Space::build(&cli.dims, cli.order.as_deref(), cli.kind).context("building space from arguments"),
    }
}

/// Fills a buffer with a counter in storage order and prints it in logical order,
/// so each printed cell shows where that element lives in memory
fn show<T: Element>(space: &Space) -> Result<()> {
    let mut buffer = space.create();
    let data = buffer
        .as_mut_slice::<T>()
        .context("buffer kind does not match the space")?;
    for (n, idx) in space.indices().enumerate() {
        space.set(data, &idx[..], T::from_f64(n as f64));
    }
    print!("{}", space.display(data));
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let space = resolve_space(&cli)?;
    info!(dims = ?space.dims(), axis_order = ?space.axis_order(), strides = ?space.strides(), kind = %space.kind(), "layout");

    match space.kind() {
        ElementKind::F64 => show::<f64>(&space),
        ElementKind::F32 => show::<f32>(&space),
        ElementKind::I32 => show::<i32>(&space),
        ElementKind::U32 => show::<u32>(&space),
        ElementKind::I16 => show::<i16>(&space),
        ElementKind::U16 => show::<u16>(&space),
        ElementKind::I8 => show::<i8>(&space),
        ElementKind::U8 => show::<u8>(&space),
    }
}
