use super::GridIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelState {
    Empty,
    Ground,
    Occupied,
    Predicted,
    Previewed,
    /// backing cell outside the grid's current active size
    Inactive,
}

impl VoxelState {
    /// state an active cell resets to: ground floor at y=0, empty above
    pub fn baseline(y: i32) -> Self {
        if y == 0 {
            VoxelState::Ground
        } else {
            VoxelState::Empty
        }
    }

    /// footprint color for the raster codec
    pub fn color(self, transparent: bool) -> [f32; 4] {
        match self {
            VoxelState::Occupied => [0.0, 0.0, 0.0, 1.0],
            VoxelState::Predicted => [1.0, 0.0, 0.0, 1.0],
            VoxelState::Previewed => [1.0, 1.0, 0.0, 1.0],
            _ => {
                if transparent {
                    [1.0, 1.0, 1.0, 0.0]
                } else {
                    [1.0, 1.0, 1.0, 1.0]
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VoxelState::Empty => "empty",
            VoxelState::Ground => "ground",
            VoxelState::Occupied => "occupied",
            VoxelState::Predicted => "predicted",
            VoxelState::Previewed => "previewed",
            VoxelState::Inactive => "inactive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "empty" => Some(VoxelState::Empty),
            "ground" => Some(VoxelState::Ground),
            "occupied" => Some(VoxelState::Occupied),
            "predicted" => Some(VoxelState::Predicted),
            "previewed" => Some(VoxelState::Previewed),
            "inactive" => Some(VoxelState::Inactive),
            _ => None,
        }
    }
}

/// One addressable cell of the grid. Identity is the index; the state is the
/// only mutable part. Scene/render resources live outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voxel {
    pub index: GridIdx,
    pub state: VoxelState,
}
