use crate::dataset::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundType {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
}

/// A set operation applied with another dataset as its right-hand side.
#[derive(Debug, Clone)]
pub struct CompoundExpr {
    pub(crate) ty: CompoundType,
    pub(crate) rhs: Box<Dataset>,
}

impl CompoundExpr {
    pub fn new(ty: CompoundType, rhs: Dataset) -> Self {
        Self {
            ty,
            rhs: Box::new(rhs),
        }
    }

    pub fn ty(&self) -> CompoundType {
        self.ty
    }

    pub fn rhs(&self) -> &Dataset {
        &self.rhs
    }
}
