use super::{grayscale, rgb_to_hsv, GridIdx, Raster, VoxelGrid, VoxelState};
use log::*;

/// The image-to-image inference collaborator. Fed a 256x256 footprint, hands
/// back a same-sized raster; synchronous, and a bad prediction is
/// indistinguishable from a good one at this seam.
pub trait Predictor {
    fn predict(&mut self, input: &Raster) -> Raster;
}

#[derive(Debug, Clone, Copy)]
pub struct DecodeParams {
    /// fraction of the grid height where decoded structure starts, in [0, 1]
    pub bottom: f32,
    /// fraction of the grid height where decoded structure ends, in [0, 1]
    pub top: f32,
    /// extra cells marked below each decoded cell
    pub thickness: u32,
    /// grayscale ceiling for a pixel to count as structure, in [0, 1]
    pub sensitivity: f32,
    /// treat pure-black pixels as full occupied columns
    pub mark_occupied: bool,
}

impl Default for DecodeParams {
    fn default() -> Self {
        Self {
            bottom: 0.0,
            top: 1.0,
            thickness: 1,
            sensitivity: 0.5,
            mark_occupied: false,
        }
    }
}

/// Projects one horizontal layer of the grid into a size.x by size.z raster.
pub fn image_from_grid(grid: &VoxelGrid, layer: i32, transparent: bool) -> Raster {
    let size = grid.size();
    let mut out = Raster::filled(size.x() as u32, size.z() as u32, [0f32; 4]);
    for x in 0..size.x() {
        for z in 0..size.z() {
            let state = grid.state([x, layer, z].into());
            out.set(x as u32, z as u32, state.color(transparent));
        }
    }
    out
}

/// Decodes a raster back onto the grid as a height field: red-dominant pixels
/// darker than `sensitivity` become Predicted cells whose height is the pixel
/// saturation scaled into [bottom, top] of the grid; `y = 0` stays reserved
/// for the ground. With `mark_occupied`, pure-black pixels fill their whole
/// column with Occupied instead. Lossy by design: only the footprint pattern
/// survives a round trip, not exact heights.
pub fn states_from_image(grid: &mut VoxelGrid, raster: &Raster, params: &DecodeParams) {
    let size = grid.size();
    let resampled = raster.resized(size.x() as u32, size.z() as u32);

    let start_y = (params.bottom * (size.y() - 1) as f32).round() as i32;
    let end_y = (params.top * (size.y() - 1) as f32).round() as i32;

    let mut predicted = 0usize;
    let mut occupied = 0usize;

    for x in 0..size.x() {
        for z in 0..size.z() {
            let pixel = resampled.get(x as u32, z as u32);
            let [r, g, b, _] = pixel;

            if params.mark_occupied && r == 0.0 && g == 0.0 && b == 0.0 {
                for y in 1..size.y() {
                    grid.set_state([x, y, z].into(), VoxelState::Occupied);
                }
                occupied += 1;
                continue;
            }

            if r > g && r > b && grayscale(pixel) < params.sensitivity {
                let (_, saturation, _) = rgb_to_hsv(pixel);
                let y = ((end_y - start_y) as f32 * saturation).round() as i32 + start_y;
                if y == 0 {
                    // ground is never predicted
                    continue;
                }

                grid.set_state([x, y, z].into(), VoxelState::Predicted);
                predicted += 1;
                for t in 1..params.thickness as i32 {
                    let below = y - t;
                    if below <= 0 {
                        break;
                    }
                    grid.set_state([x, below, z].into(), VoxelState::Predicted);
                }
            }
        }
    }

    debug!(
        "states_from_image: {} predicted, {} occupied columns",
        predicted, occupied
    );
}

/// One full edit-session round trip with the inference collaborator: export
/// the footprint, predict, then decode the answer over a clean slate of
/// predictions.
pub fn apply_prediction<P: Predictor + ?Sized>(
    grid: &mut VoxelGrid,
    predictor: &mut P,
    params: &DecodeParams,
) {
    let footprint = image_from_grid(grid, 0, true);
    let input = footprint.fit256([1.0, 1.0, 1.0, 1.0]);
    let output = predictor.predict(&input);

    grid.clear_predicted();
    states_from_image(grid, &output, params);
}

/// Occupied (x, z) columns of the active view, for footprint comparisons.
pub fn occupied_columns(grid: &VoxelGrid) -> Vec<GridIdx> {
    let size = grid.size();
    let mut out = Vec::new();
    for x in 0..size.x() {
        for z in 0..size.z() {
            let hit = (0..size.y())
                .any(|y| grid.state([x, y, z].into()) == VoxelState::Occupied);
            if hit {
                out.push(GridIdx::new([x, 0, z]));
            }
        }
    }
    out
}
