#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd)]
pub struct RowIndex(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Ord, PartialOrd)]
pub struct ColumnIndex(pub usize);

/// Number of cells along one side of a square grid.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct SideLength(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellsCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct PassagesCount(pub usize);
