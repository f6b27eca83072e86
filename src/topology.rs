use super::GridIdx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn unit(self) -> GridIdx {
        match self {
            Axis::X => GridIdx::new([1, 0, 0]),
            Axis::Y => GridIdx::new([0, 1, 0]),
            Axis::Z => GridIdx::new([0, 0, 1]),
        }
    }

    /// the two axes orthogonal to this one
    pub fn others(self) -> [Axis; 2] {
        match self {
            Axis::X => [Axis::Y, Axis::Z],
            Axis::Y => [Axis::X, Axis::Z],
            Axis::Z => [Axis::X, Axis::Y],
        }
    }
}

/// Lattice face normal to `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub index: GridIdx,
    pub axis: Axis,
}

/// Lattice edge running along `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub index: GridIdx,
    pub axis: Axis,
}

/// Face and edge lattices derived from the grid size. Pure data for layers
/// built on top of the grid; rebuilt whenever the size changes.
#[derive(Debug, Default)]
pub struct Topology {
    faces: [Vec<Face>; 3],
    face_dims: [GridIdx; 3],
    edges: [Vec<Edge>; 3],
    edge_dims: [GridIdx; 3],
}

impl Topology {
    pub fn new(size: GridIdx) -> Self {
        let mut out = Self::default();

        for (n, axis) in Axis::ALL.into_iter().enumerate() {
            // one extra face layer along the face's own axis
            let dims = size + axis.unit();
            out.face_dims[n] = dims;
            out.faces[n] = lattice(dims)
                .map(|index| Face { index, axis })
                .collect();

            // one extra edge row along both orthogonal axes
            let [a, b] = axis.others();
            let dims = size + a.unit() + b.unit();
            out.edge_dims[n] = dims;
            out.edges[n] = lattice(dims)
                .map(|index| Edge { index, axis })
                .collect();
        }

        out
    }

    pub fn faces(&self, axis: Axis) -> &[Face] {
        &self.faces[axis as usize]
    }

    pub fn face_dims(&self, axis: Axis) -> GridIdx {
        self.face_dims[axis as usize]
    }

    pub fn edges(&self, axis: Axis) -> &[Edge] {
        &self.edges[axis as usize]
    }

    pub fn edge_dims(&self, axis: Axis) -> GridIdx {
        self.edge_dims[axis as usize]
    }
}

fn lattice(dims: GridIdx) -> impl Iterator<Item = GridIdx> {
    (0..dims.x()).flat_map(move |x| {
        (0..dims.y()).flat_map(move |y| (0..dims.z()).map(move |z| GridIdx::new([x, y, z])))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_lattice_dims() {
        let t = Topology::new(GridIdx::new([4, 2, 3]));

        assert_eq!(t.face_dims(Axis::X), GridIdx::new([5, 2, 3]));
        assert_eq!(t.face_dims(Axis::Y), GridIdx::new([4, 3, 3]));
        assert_eq!(t.face_dims(Axis::Z), GridIdx::new([4, 2, 4]));

        for axis in Axis::ALL {
            assert_eq!(t.faces(axis).len(), t.face_dims(axis).volume());
        }
    }

    #[test]
    fn edge_lattice_dims() {
        let t = Topology::new(GridIdx::new([4, 2, 3]));

        assert_eq!(t.edge_dims(Axis::X), GridIdx::new([4, 3, 4]));
        assert_eq!(t.edge_dims(Axis::Y), GridIdx::new([5, 2, 4]));
        assert_eq!(t.edge_dims(Axis::Z), GridIdx::new([5, 3, 3]));

        for axis in Axis::ALL {
            assert_eq!(t.edges(axis).len(), t.edge_dims(axis).volume());
        }
    }

    #[test]
    fn one_record_per_coordinate() {
        let t = Topology::new(GridIdx::new([2, 2, 2]));
        let faces = t.faces(Axis::Y);
        assert_eq!(faces.len(), 2 * 3 * 2);
        assert!(faces.iter().all(|f| f.axis == Axis::Y));
        assert!(faces.iter().all(|f| f.index.within(t.face_dims(Axis::Y))));
        // exhaustive: no duplicates
        let mut seen = faces.iter().map(|f| f.index).collect::<Vec<_>>();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), faces.len());
    }
}
