use {crate::*, glam::IVec2};

#[derive(Clone, Copy, Debug, PartialEq)]
struct HeightCell(u8);

impl HeightCell {
    const START: u8 = b'S';
    const END: u8 = b'E';
    const LOWEST: u8 = LOWERCASE_A_OFFSET;
    const HIGHEST: u8 = b'z';
}

#[derive(Debug, PartialEq)]
pub struct InvalidHeightCellChar(char);

impl TryFrom<char> for HeightCell {
    type Error = InvalidHeightCellChar;

    fn try_from(height_cell_char: char) -> Result<Self, Self::Error> {
        if height_cell_char.is_ascii_lowercase()
            || height_cell_char == Self::START as char
            || height_cell_char == Self::END as char
        {
            Ok(Self(height_cell_char as u8))
        } else {
            Err(InvalidHeightCellChar(height_cell_char))
        }
    }
}

#[derive(Debug, PartialEq)]
struct HeightGrid {
    heights: Grid2D<HeightCell>,
    start: IVec2,
    end: IVec2,
}

impl HeightGrid {
    /// A step may climb at most one unit, but may drop arbitrarily far.
    fn ascent_allowed(from: &HeightCell, to: &HeightCell) -> bool {
        to.0 <= from.0 + 1_u8
    }

    /// `ascent_allowed` with the edge direction flipped, for searching backward from the end.
    fn descent_allowed(from: &HeightCell, to: &HeightCell) -> bool {
        Self::ascent_allowed(to, from)
    }
}

#[derive(Debug, PartialEq)]
pub enum HeightGridParseError<'s> {
    FailedToParseGrid(GridParseError<'s, InvalidHeightCellChar>),
    GridContainsNoSingleStartPosition,
    GridContainsNoSingleEndPosition,
}

impl<'s> TryFrom<&'s str> for HeightGrid {
    type Error = HeightGridParseError<'s>;

    fn try_from(height_grid_str: &'s str) -> Result<Self, Self::Error> {
        use HeightGridParseError::*;

        let mut heights: Grid2D<HeightCell> =
            height_grid_str.try_into().map_err(FailedToParseGrid)?;

        let start: IVec2 = heights
            .try_find_single_position_with_cell(&HeightCell(HeightCell::START))
            .ok_or(GridContainsNoSingleStartPosition)?;
        let end: IVec2 = heights
            .try_find_single_position_with_cell(&HeightCell(HeightCell::END))
            .ok_or(GridContainsNoSingleEndPosition)?;

        heights.get_mut(start).unwrap().0 = HeightCell::LOWEST;
        heights.get_mut(end).unwrap().0 = HeightCell::HIGHEST;

        Ok(HeightGrid {
            heights,
            start,
            end,
        })
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(HeightGrid);

impl Solution {
    fn fewest_steps_from_start(&self) -> Option<usize> {
        find_shortest_path(
            &self.0.heights,
            self.0.start,
            self.0.end,
            HeightGrid::ascent_allowed,
        )
        .ok()
        .map(|path| path.len() - 1_usize)
    }

    fn fewest_steps_from_any_lowest(&self) -> Option<u32> {
        breadth_first_distances(&self.0.heights, self.0.end, HeightGrid::descent_allowed)
            .ok()
            .and_then(|distances| {
                self.0
                    .heights
                    .iter_filtered_positions(|height_cell| height_cell.0 == HeightCell::LOWEST)
                    .map(|pos| *distances.get(pos).unwrap())
                    .filter(|&distance| distance != UNDISCOVERED)
                    .min()
            })
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.fewest_steps_from_start());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.fewest_steps_from_any_lowest());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = HeightGridParseError<'i>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self(input.try_into()?))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &str = concat!(
        "Sabqponm\n",
        "abcryxxl\n",
        "accszExk\n",
        "acctuvwj\n",
        "abdefghi",
    );

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_solution_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.start, IVec2::ZERO);
        assert_eq!(solution.0.end, IVec2::new(5_i32, 2_i32));
        assert_eq!(
            solution.0.heights.get(solution.0.start),
            Some(&HeightCell(HeightCell::LOWEST))
        );
        assert_eq!(
            solution.0.heights.get(solution.0.end),
            Some(&HeightCell(HeightCell::HIGHEST))
        );
        pretty_assert_eq!(
            Solution::try_from("abc\nabc"),
            Err(HeightGridParseError::GridContainsNoSingleStartPosition)
        );
    }

    #[test]
    fn test_fewest_steps_from_start() {
        assert_eq!(solution().fewest_steps_from_start(), Some(31_usize));
    }

    #[test]
    fn test_fewest_steps_from_any_lowest() {
        assert_eq!(solution().fewest_steps_from_any_lowest(), Some(29_u32));
    }
}
