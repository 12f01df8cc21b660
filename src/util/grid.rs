use {
    glam::{BVec2, IVec2},
    static_assertions::const_assert,
    std::{
        fmt::{Debug, DebugList, Formatter, Result as FmtResult},
        iter::Peekable,
        mem::transmute,
        ops::{Range, RangeInclusive},
        str::Lines,
    },
    strum::{EnumCount, EnumIter},
};

#[derive(Copy, Clone, Debug, Default, EnumCount, EnumIter, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

// This guarantees we can safely convert from `u8` to `Direction` by masking the smallest 2 bits,
// which is the same as masking by `MASK`
const_assert!(Direction::COUNT == 4_usize);

impl Direction {
    pub const COUNT_U8: u8 = Self::COUNT as u8;
    pub const MASK: u8 = Self::COUNT_U8 - 1_u8;
    pub const HALF_COUNT: u8 = Self::COUNT_U8 / 2_u8;

    const VECS: [IVec2; Self::COUNT] = [IVec2::NEG_Y, IVec2::X, IVec2::Y, IVec2::NEG_X];

    #[inline]
    pub const fn vec(self) -> IVec2 {
        Self::VECS[self as usize]
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        // SAFETY: See `const_assert` above
        unsafe { transmute(value & Self::MASK) }
    }

    #[inline]
    pub const fn rev(self) -> Self {
        Self::from_u8(self as u8 + Self::HALF_COUNT)
    }
}

impl From<u8> for Direction {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl TryFrom<IVec2> for Direction {
    type Error = ();

    fn try_from(value: IVec2) -> Result<Self, Self::Error> {
        Self::VECS
            .iter()
            .position(|vec| *vec == value)
            .map(|index| (index as u8).into())
            .ok_or(())
    }
}

#[derive(Debug, PartialEq)]
pub enum CellIterFromRangeError {
    PositionsIdentical,
    PositionsNotAligned,
}

impl TryFrom<Range<IVec2>> for Direction {
    type Error = CellIterFromRangeError;

    fn try_from(Range { start, end }: Range<IVec2>) -> Result<Self, Self::Error> {
        use CellIterFromRangeError::*;

        let delta: IVec2 = end - start;

        if delta == IVec2::ZERO {
            Err(PositionsIdentical)
        } else if delta.x != 0_i32 && delta.y != 0_i32 {
            Err(PositionsNotAligned)
        } else {
            let abs: IVec2 = delta.abs();

            Ok((delta / (abs.x + abs.y)).try_into().unwrap())
        }
    }
}

pub struct SideLen(pub usize);

impl From<SideLen> for IVec2 {
    fn from(side_len: SideLen) -> Self {
        IVec2::new(side_len.0 as i32, side_len.0 as i32)
    }
}

pub fn grid_2d_contains(pos: IVec2, dimensions: IVec2) -> bool {
    (pos.cmpge(IVec2::ZERO) & pos.cmplt(dimensions)).all()
}

pub fn grid_2d_pos_from_index_and_dimensions(index: usize, dimensions: IVec2) -> IVec2 {
    let x: usize = dimensions.x as usize;

    IVec2::new((index % x) as i32, (index / x) as i32)
}

pub fn grid_2d_try_index_from_pos_and_dimensions(pos: IVec2, dimensions: IVec2) -> Option<usize> {
    grid_2d_contains(pos, dimensions)
        .then(|| pos.y as usize * dimensions.x as usize + pos.x as usize)
}

pub struct Grid2D<T> {
    cells: Vec<T>,

    /// Should only contain unsigned values, but is signed for ease of use for iterating
    dimensions: IVec2,
}

impl<T> Grid2D<T> {
    pub fn try_from_cells_and_dimensions(cells: Vec<T>, dimensions: IVec2) -> Option<Self> {
        if dimensions.cmpge(IVec2::ZERO) == BVec2::TRUE
            && cells.len() == dimensions.x as usize * dimensions.y as usize
        {
            Some(Self { cells, dimensions })
        } else {
            None
        }
    }

    pub fn empty(dimensions: IVec2) -> Self {
        Self {
            cells: Vec::new(),
            dimensions,
        }
    }

    pub fn allocate(dimensions: IVec2) -> Self {
        Self {
            cells: Vec::with_capacity((dimensions.x * dimensions.y) as usize),
            dimensions,
        }
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline]
    pub fn dimensions(&self) -> IVec2 {
        self.dimensions
    }

    #[inline]
    pub fn area(&self) -> usize {
        (self.dimensions.x * self.dimensions.y) as usize
    }

    #[inline]
    pub fn index_from_pos(&self, pos: IVec2) -> usize {
        pos.y as usize * self.dimensions.x as usize + pos.x as usize
    }

    pub fn try_index_from_pos(&self, pos: IVec2) -> Option<usize> {
        grid_2d_try_index_from_pos_and_dimensions(pos, self.dimensions)
    }

    pub fn pos_from_index(&self, index: usize) -> IVec2 {
        grid_2d_pos_from_index_and_dimensions(index, self.dimensions)
    }

    #[inline(always)]
    pub fn max_dimensions(&self) -> IVec2 {
        self.dimensions - IVec2::ONE
    }

    pub fn get(&self, pos: IVec2) -> Option<&T> {
        self.try_index_from_pos(pos)
            .map(|index: usize| &self.cells[index])
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = IVec2> {
        let dimensions: IVec2 = self.dimensions;

        CellIter2D::try_from(IVec2::ZERO..IVec2::new(0_i32, dimensions.y))
            .unwrap()
            .flat_map(move |pos| {
                CellIter2D::try_from(pos..IVec2::new(dimensions.x, pos.y)).unwrap()
            })
    }

    pub fn iter_filtered_positions<'a, P: Fn(&T) -> bool + 'a>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = IVec2> + 'a {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, cell)| predicate(cell).then(|| self.pos_from_index(index)))
    }

    pub fn iter_positions_with_cell<'a>(&'a self, target: &'a T) -> impl Iterator<Item = IVec2> + 'a
    where
        T: PartialEq,
    {
        self.iter_filtered_positions(|cell| *cell == *target)
    }

    pub fn try_find_single_position_with_cell(&self, target: &T) -> Option<IVec2>
    where
        T: PartialEq,
    {
        self.iter_positions_with_cell(target)
            .try_fold(None, |prev_pos, curr_pos| {
                prev_pos.is_none().then_some(Some(curr_pos))
            })
            .flatten()
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut T> {
        self.try_index_from_pos(pos)
            .map(|index: usize| &mut self.cells[index])
    }
}

impl<T: Clone> Clone for Grid2D<T> {
    fn clone(&self) -> Self {
        Self {
            cells: self.cells.clone(),
            dimensions: self.dimensions,
        }
    }
}

impl<T: Debug> Debug for Grid2D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Grid2D")?;
        let mut y_list: DebugList = f.debug_list();

        for y in 0_i32..self.dimensions.y {
            let start: usize = (y * self.dimensions.x) as usize;

            y_list.entry(&&self.cells[start..(start + self.dimensions.x as usize)]);
        }

        y_list.finish()
    }
}

impl<T: PartialEq> PartialEq for Grid2D<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions && self.cells == other.cells
    }
}

#[allow(dead_code)]
#[derive(Debug, PartialEq)]
pub enum GridParseError<'s, E> {
    NoInitialToken,
    IsNotAscii(&'s str),
    InvalidLength { line: &'s str, expected_len: usize },
    CellParseError(E),
}

impl<'s, E, T: TryFrom<char, Error = E>> TryFrom<&'s str> for Grid2D<T> {
    type Error = GridParseError<'s, E>;

    fn try_from(grid_str: &'s str) -> Result<Self, Self::Error> {
        use GridParseError as Error;

        let mut grid_line_iter: Peekable<Lines> = grid_str.lines().peekable();

        let side_len: usize = grid_line_iter.peek().ok_or(Error::NoInitialToken)?.len();

        let mut grid: Grid2D<T> = Grid2D::allocate(SideLen(side_len).into());
        let mut lines: usize = 0_usize;

        for grid_line_str in grid_line_iter {
            if !grid_line_str.is_ascii() {
                return Err(Error::IsNotAscii(grid_line_str));
            }

            if grid_line_str.len() != side_len {
                return Err(Error::InvalidLength {
                    line: grid_line_str,
                    expected_len: side_len,
                });
            }

            for cell_char in grid_line_str.chars() {
                grid.cells
                    .push(cell_char.try_into().map_err(Error::CellParseError)?);
            }

            lines += 1_usize;
        }

        if lines != side_len {
            grid.dimensions.y = lines as i32;
        }

        Ok(grid)
    }
}

pub struct CellIter2D {
    curr: IVec2,
    end: IVec2,
    dir: Direction,
}

impl Iterator for CellIter2D {
    type Item = IVec2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.curr != self.end {
            let prev: IVec2 = self.curr;

            self.curr += self.dir.vec();

            Some(prev)
        } else {
            None
        }
    }
}

impl TryFrom<Range<IVec2>> for CellIter2D {
    type Error = CellIterFromRangeError;

    fn try_from(range: Range<IVec2>) -> Result<Self, Self::Error> {
        let curr: IVec2 = range.start;
        let end: IVec2 = range.end;

        Direction::try_from(range).map(|dir| Self { curr, end, dir })
    }
}

impl TryFrom<RangeInclusive<IVec2>> for CellIter2D {
    type Error = CellIterFromRangeError;

    fn try_from(range_inclusive: RangeInclusive<IVec2>) -> Result<Self, Self::Error> {
        let (curr, end): (IVec2, IVec2) = range_inclusive.into_inner();
        let dir: Direction = Direction::try_from(curr..end)?;

        Ok(Self {
            curr,
            end: end + dir.vec(),
            dir,
        })
    }
}

pub fn manhattan_magnitude_2d(pos: IVec2) -> i32 {
    let abs: IVec2 = pos.abs();

    abs.x + abs.y
}

pub fn manhattan_distance_2d(a: IVec2, b: IVec2) -> i32 {
    manhattan_magnitude_2d(a - b)
}
