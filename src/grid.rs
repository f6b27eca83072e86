use super::{BoundingBox, GridIdx, Topology, Voxel, VoxelState};
use log::*;
use nalgebra::Vector3;
use rand::Rng;

/// Dense voxel store. The backing array is allocated once at `max_size`;
/// `size` addresses the active view inside it. Cells outside the active view
/// hold `VoxelState::Inactive` and are never returned by `voxels()`.
pub struct VoxelGrid {
    size: GridIdx,
    max_size: GridIdx,
    origin: Vector3<f32>,
    voxel_size: f32,

    voxels: Vec<Voxel>,
    topology: Topology,

    corners: [Option<GridIdx>; 2],
    selection: Vec<GridIdx>,
    dirty: Vec<GridIdx>,
}

impl VoxelGrid {
    pub fn new(size: GridIdx, max_size: GridIdx, origin: Vector3<f32>, voxel_size: f32) -> Self {
        for axis in 0..3 {
            assert!(size.idx[axis] > 0, "empty grid size: {:?}", size);
            assert!(
                size.idx[axis] <= max_size.idx[axis],
                "grid size {:?} exceeds backing size {:?}",
                size,
                max_size
            );
        }

        let mut voxels = Vec::with_capacity(max_size.volume());
        for x in 0..max_size.x() {
            for y in 0..max_size.y() {
                for z in 0..max_size.z() {
                    let index = GridIdx::new([x, y, z]);
                    let state = if index.within(size) {
                        VoxelState::baseline(y)
                    } else {
                        VoxelState::Inactive
                    };
                    voxels.push(Voxel { index, state });
                }
            }
        }

        Self {
            size,
            max_size,
            origin,
            voxel_size,
            voxels,
            topology: Topology::new(size),
            corners: [None, None],
            selection: Vec::new(),
            dirty: Vec::new(),
        }
    }

    /// grid with no headroom for growth, unit voxels, zero origin
    pub fn with_size(size: GridIdx) -> Self {
        Self::new(size, size, Vector3::zeros(), 1.0)
    }

    pub fn size(&self) -> GridIdx {
        self.size
    }

    pub fn max_size(&self) -> GridIdx {
        self.max_size
    }

    pub fn origin(&self) -> Vector3<f32> {
        self.origin
    }

    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn corners(&self) -> [Option<GridIdx>; 2] {
        self.corners
    }

    pub fn selection(&self) -> &[GridIdx] {
        &self.selection
    }

    fn offset(&self, idx: GridIdx) -> usize {
        assert!(
            idx.within(self.max_size),
            "index {:?} outside backing array {:?}",
            idx,
            self.max_size
        );
        ((idx.x() * self.max_size.y() + idx.y()) * self.max_size.z() + idx.z()) as usize
    }

    pub fn voxel(&self, idx: GridIdx) -> &Voxel {
        &self.voxels[self.offset(idx)]
    }

    pub fn state(&self, idx: GridIdx) -> VoxelState {
        self.voxels[self.offset(idx)].state
    }

    /// Writes a cell of the active view and records it in the change log.
    /// Returns false when the cell already held the state.
    pub fn set_state(&mut self, idx: GridIdx, state: VoxelState) -> bool {
        assert!(
            idx.within(self.size),
            "index {:?} outside active grid {:?}",
            idx,
            self.size
        );
        self.set_raw(idx, state)
    }

    // backing-array write, used by resize to cross the active boundary
    fn set_raw(&mut self, idx: GridIdx, state: VoxelState) -> bool {
        let offset = self.offset(idx);
        if self.voxels[offset].state == state {
            return false;
        }
        self.voxels[offset].state = state;
        self.dirty.push(idx);
        true
    }

    /// Cells of the active view, x-outer / z-inner order.
    pub fn voxels(&self) -> impl Iterator<Item = &Voxel> {
        let size = self.size;
        self.voxels.iter().filter(move |v| v.index.within(size))
    }

    /// Drains the change log: every cell whose state changed since the last
    /// drain, in write order. May contain a cell more than once.
    pub fn take_dirty(&mut self) -> Vec<GridIdx> {
        std::mem::take(&mut self.dirty)
    }

    /// World-space center of a cell, for whatever draws the grid.
    pub fn world_center(&self, idx: GridIdx) -> Vector3<f32> {
        let half = 0.5f32;
        self.origin
            + Vector3::new(
                (idx.x() as f32 + half) * self.voxel_size,
                (idx.y() as f32 + half) * self.voxel_size,
                (idx.z() as f32 + half) * self.voxel_size,
            )
    }

    /// Adjacent cells in +x/-x/+y/-y/+z/-z order; None where the neighbor
    /// falls outside the current active size.
    pub fn face_neighbors(&self, idx: GridIdx) -> [Option<GridIdx>; 6] {
        const DIRECTIONS: [[i32; 3]; 6] = [
            [1, 0, 0],
            [-1, 0, 0],
            [0, 1, 0],
            [0, -1, 0],
            [0, 0, 1],
            [0, 0, -1],
        ];

        let mut out = [None; 6];
        for (slot, dir) in out.iter_mut().zip(DIRECTIONS) {
            let next = idx + dir.into();
            if next.within(self.size) {
                *slot = Some(next);
            }
        }
        out
    }

    /// Records a two-corner pick. The previous selection's previewed cells
    /// revert to baseline; every cell of the new inclusive bounding box is
    /// collected, and all but `a` are marked Previewed. `a` keeps the state
    /// the caller gave it.
    pub fn set_corners(&mut self, a: GridIdx, b: GridIdx) {
        for idx in std::mem::take(&mut self.selection) {
            if self.state(idx) == VoxelState::Previewed {
                self.set_state(idx, VoxelState::baseline(idx.y()));
            }
        }

        self.corners = [Some(a), Some(b)];

        let mut bb = BoundingBox::default();
        bb.add(a);
        bb.add(b);
        let lo = bb.min();
        let hi = bb.max();

        for x in lo.x()..=hi.x() {
            for y in lo.y()..=hi.y() {
                for z in lo.z()..=hi.z() {
                    let idx = GridIdx::new([x, y, z]);
                    self.selection.push(idx);
                    if idx != a {
                        self.set_state(idx, VoxelState::Previewed);
                    }
                }
            }
        }
    }

    /// Extrudes the current selection: every selected (x, z) column is filled
    /// with Occupied from the ground up to `height` cells. The selection is
    /// consumed. Callers clamp height to [1, size.y].
    pub fn make_box(&mut self, height: i32) {
        if self.selection.is_empty() {
            debug!("make_box: nothing selected");
            return;
        }

        for idx in std::mem::take(&mut self.selection) {
            for y in 0..height {
                self.set_state([idx.x(), y, idx.z()].into(), VoxelState::Occupied);
            }
        }
        self.corners = [None, None];
    }

    /// Fills a random-sized box anchored at `origin` with Occupied, if the
    /// region generator finds an opposite corner inside the grid. The box is
    /// exclusive on the max-x side and inclusive on y/z.
    pub fn rectangle_from_corner<R: Rng>(&mut self, rng: &mut R, origin: GridIdx, size: GridIdx) {
        let corner = match super::find_opposite_corner(rng, self, origin, size) {
            Some(corner) => corner,
            None => {
                debug!(
                    "rectangle_from_corner: no fit for origin={:?} size={:?}",
                    origin, size
                );
                return;
            }
        };

        let lo = origin.bb_min(&corner);
        let hi = origin.bb_max(&corner);
        for x in lo.x()..hi.x() {
            for y in lo.y()..=hi.y() {
                for z in lo.z()..=hi.z() {
                    self.set_state([x, y, z].into(), VoxelState::Occupied);
                }
            }
        }
    }

    /// Resets every active cell to baseline and drops any pending selection.
    pub fn clear(&mut self) {
        for x in 0..self.size.x() {
            for y in 0..self.size.y() {
                for z in 0..self.size.z() {
                    self.set_state([x, y, z].into(), VoxelState::baseline(y));
                }
            }
        }
        self.corners = [None, None];
        self.selection.clear();
    }

    /// Reverts only Predicted cells to baseline, leaving user-placed
    /// structure alone.
    pub fn clear_predicted(&mut self) {
        for x in 0..self.size.x() {
            for y in 0..self.size.y() {
                for z in 0..self.size.z() {
                    let idx = GridIdx::new([x, y, z]);
                    if self.state(idx) == VoxelState::Predicted {
                        self.set_state(idx, VoxelState::baseline(y));
                    }
                }
            }
        }
    }

    /// Repartitions the backing array for a new active size. Cells leaving
    /// the view become Inactive and lose their state; cells entering it reset
    /// to baseline; cells active in both keep their state. The topology
    /// tables are rebuilt. `new_size` must fit the backing array.
    pub fn resize(&mut self, new_size: GridIdx) {
        for axis in 0..3 {
            assert!(new_size.idx[axis] > 0, "empty grid size: {:?}", new_size);
            assert!(
                new_size.idx[axis] <= self.max_size.idx[axis],
                "grid size {:?} exceeds backing size {:?}",
                new_size,
                self.max_size
            );
        }

        for idx in std::mem::take(&mut self.selection) {
            if self.state(idx) == VoxelState::Previewed {
                self.set_raw(idx, VoxelState::baseline(idx.y()));
            }
        }
        self.corners = [None, None];

        let span = self.size.bb_max(&new_size);
        for x in 0..span.x() {
            for y in 0..span.y() {
                for z in 0..span.z() {
                    let idx = GridIdx::new([x, y, z]);
                    let was = idx.within(self.size);
                    let now = idx.within(new_size);
                    if was && !now {
                        self.set_raw(idx, VoxelState::Inactive);
                    } else if !was && now {
                        self.set_raw(idx, VoxelState::baseline(y));
                    }
                }
            }
        }

        info!("resize: {:?} -> {:?}", self.size, new_size);
        self.size = new_size;
        self.topology = Topology::new(new_size);
    }
}
