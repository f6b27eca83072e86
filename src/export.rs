use super::{GridIdx, VoxelGrid, VoxelState};
use anyhow::{anyhow, Context, Result};
use log::*;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

/// Writes the active voxels whose state passes `filters` as one
/// `x,y,z,state-name` line each. An empty path is a no-op; a missing parent
/// directory is created.
pub fn save_voxels(grid: &VoxelGrid, filters: &[VoxelState], path: &str) -> Result<()> {
    if path.is_empty() {
        debug!("save_voxels: no target, skipping");
        return Ok(());
    }

    if let Some(dir) = Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let w = File::create(path)?;
    let mut w = BufWriter::new(w);

    let mut count = 0;
    for voxel in grid.voxels() {
        if !filters.contains(&voxel.state) {
            continue;
        }
        let idx = voxel.index;
        write!(
            &mut w,
            "{},{},{},{}\n",
            idx.x(),
            idx.y(),
            idx.z(),
            voxel.state.name()
        )?;
        count += 1;
    }

    info!("save_voxels: {} voxels -> {}", count, path);
    Ok(())
}

/// Reads a record file back onto the grid. Records outside the active view
/// are rejected rather than clipped.
pub fn load_voxels(grid: &mut VoxelGrid, path: &str) -> Result<usize> {
    let file = File::open(path).with_context(|| format!("open {}", path))?;
    let reader = std::io::BufReader::new(file);

    let mut count = 0;
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = line.split(',').collect::<Vec<_>>();
        if fields.len() != 4 {
            return Err(anyhow!("{}:{}: expected x,y,z,state", path, number + 1));
        }

        let mut idx = [0i32; 3];
        for (slot, field) in idx.iter_mut().zip(&fields) {
            *slot = field
                .trim()
                .parse()
                .with_context(|| format!("{}:{}: bad coordinate", path, number + 1))?;
        }
        let idx = GridIdx::new(idx);
        if !idx.within(grid.size()) {
            return Err(anyhow!("{}:{}: {:?} outside the grid", path, number + 1, idx));
        }

        let state = VoxelState::from_name(fields[3].trim())
            .ok_or_else(|| anyhow!("{}:{}: unknown state {}", path, number + 1, fields[3]))?;

        grid.set_state(idx, state);
        count += 1;
    }

    info!("load_voxels: {} voxels <- {}", count, path);
    Ok(count)
}
