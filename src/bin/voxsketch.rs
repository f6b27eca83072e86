use anyhow::{anyhow, Result};
use argh::FromArgs;
use log::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simple_stopwatch::Stopwatch;
use voxsketch::*;

#[derive(FromArgs)]
/// toplevel
struct TopLevel {
    #[argh(subcommand)]
    nested: SubCommandEnum,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommandEnum {
    Sample(SubCommandSample),
    Encode(SubCommandEncode),
    Decode(SubCommandDecode),
}

#[derive(FromArgs, PartialEq, Debug)]
/// populate a grid with random boxes and export footprint + records
#[argh(subcommand, name = "sample")]
struct SubCommandSample {
    /// rng seed
    #[argh(option, default = "1")]
    seed: u64,

    /// number of boxes
    #[argh(option, default = "10")]
    count: usize,

    /// grid size as x,y,z
    #[argh(option, default = "String::from(\"64,10,64\")")]
    size: String,

    /// box extent range on x, as min,max
    #[argh(option, default = "String::from(\"10,15\")")]
    xrange: String,

    /// box extent range on z, as min,max
    #[argh(option, default = "String::from(\"10,15\")")]
    zrange: String,

    /// output directory
    #[argh(option)]
    outdir: String,
}

#[derive(FromArgs, PartialEq, Debug)]
/// rebuild a grid from a record file and export its footprint image
#[argh(subcommand, name = "encode")]
struct SubCommandEncode {
    /// input record file
    #[argh(option)]
    records: String,

    /// grid size as x,y,z
    #[argh(option, default = "String::from(\"64,10,64\")")]
    size: String,

    /// footprint layer
    #[argh(option, default = "0")]
    layer: i32,

    /// transparent background instead of white
    #[argh(switch)]
    transparent: bool,

    /// output image filename
    #[argh(option)]
    out: String,
}

#[derive(FromArgs, PartialEq, Debug)]
/// decode an image onto a fresh grid and export the decoded records
#[argh(subcommand, name = "decode")]
struct SubCommandDecode {
    /// input image filename
    #[argh(option)]
    image: String,

    /// grid size as x,y,z
    #[argh(option, default = "String::from(\"64,10,64\")")]
    size: String,

    /// lower bound of the decoded height band, 0..1
    #[argh(option, default = "0.0")]
    bottom: f32,

    /// upper bound of the decoded height band, 0..1
    #[argh(option, default = "1.0")]
    top: f32,

    /// cells marked below each decoded cell
    #[argh(option, default = "1")]
    thickness: u32,

    /// grayscale ceiling for structure pixels, 0..1
    #[argh(option, default = "0.5")]
    sensitivity: f32,

    /// treat pure-black pixels as occupied columns
    #[argh(switch)]
    mark_occupied: bool,

    /// output record filename
    #[argh(option)]
    out: String,
}

fn parse_triple(text: &str) -> Result<GridIdx> {
    let fields = text
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()?;
    if fields.len() != 3 {
        return Err(anyhow!("expected x,y,z, got {}", text));
    }
    Ok(GridIdx::new([fields[0], fields[1], fields[2]]))
}

fn parse_range(text: &str) -> Result<(i32, i32)> {
    let fields = text
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()?;
    if fields.len() != 2 {
        return Err(anyhow!("expected min,max, got {}", text));
    }
    Ok((fields[0], fields[1]))
}

fn run_sample(opt: SubCommandSample) -> Result<()> {
    let size = parse_triple(&opt.size)?;
    let (min_x, max_x) = parse_range(&opt.xrange)?;
    let (min_z, max_z) = parse_range(&opt.zrange)?;

    let mut grid = VoxelGrid::with_size(size);
    let mut rng = ChaCha8Rng::seed_from_u64(opt.seed);

    let sw = Stopwatch::start_new();
    place_random_boxes(&mut rng, &mut grid, opt.count, min_x, max_x, min_z, max_z);
    info!(
        "sample: seed={}, boxes={}, columns={}, took={:.2}ms",
        opt.seed,
        opt.count,
        occupied_columns(&grid).len(),
        sw.ms()
    );

    let image = image_from_grid(&grid, 0, true);
    let resized = image.fit256([1.0, 1.0, 1.0, 1.0]);
    resized.save_png(&format!("{}/sample_{:04}.png", opt.outdir, opt.seed))?;
    save_voxels(
        &grid,
        &[VoxelState::Occupied],
        &format!("{}/sample_{:04}.csv", opt.outdir, opt.seed),
    )?;
    Ok(())
}

fn run_encode(opt: SubCommandEncode) -> Result<()> {
    let size = parse_triple(&opt.size)?;
    let mut grid = VoxelGrid::with_size(size);
    load_voxels(&mut grid, &opt.records)?;

    let layer = opt.layer.clamp(0, size.y() - 1);
    let image = image_from_grid(&grid, layer, opt.transparent);
    image.fit256([1.0, 1.0, 1.0, 1.0]).save_png(&opt.out)?;
    Ok(())
}

fn run_decode(opt: SubCommandDecode) -> Result<()> {
    let size = parse_triple(&opt.size)?;
    let raster = Raster::load_png(&opt.image)?;

    let params = DecodeParams {
        bottom: opt.bottom.clamp(0.0, 1.0),
        top: opt.top.clamp(0.0, 1.0),
        thickness: opt.thickness,
        sensitivity: opt.sensitivity.clamp(0.0, 1.0),
        mark_occupied: opt.mark_occupied,
    };

    let mut grid = VoxelGrid::with_size(size);
    let sw = Stopwatch::start_new();
    states_from_image(&mut grid, &raster, &params);
    info!(
        "decode: {}x{} image, columns={}, took={:.2}ms",
        raster.width(),
        raster.height(),
        occupied_columns(&grid).len(),
        sw.ms()
    );

    save_voxels(
        &grid,
        &[VoxelState::Predicted, VoxelState::Occupied],
        &opt.out,
    )?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let opt: TopLevel = argh::from_env();

    match opt.nested {
        SubCommandEnum::Sample(opt) => run_sample(opt),
        SubCommandEnum::Encode(opt) => run_encode(opt),
        SubCommandEnum::Decode(opt) => run_decode(opt),
    }
}
