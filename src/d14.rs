use {
    crate::*,
    glam::IVec2,
    nom::{
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::{map, opt},
        error::Error,
        multi::{many0, separated_list1},
        sequence::{separated_pair, terminated},
        Err, IResult,
    },
};

const SAND_SOURCE: IVec2 = IVec2::new(500_i32, 0_i32);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum SandCell {
    #[default]
    Air,
    Rock,
    Sand,
}

#[derive(Debug, PartialEq)]
enum AddSandError {
    FellOutOfBounds,
    SourceBlocked,
}

struct SandGrid {
    cells: Grid2D<SandCell>,
    source: IVec2,
}

impl SandGrid {
    fn step(&self, sand: IVec2) -> Option<IVec2> {
        const DELTA_CANDIDATES: [IVec2; 3_usize] =
            [IVec2::Y, IVec2::new(-1_i32, 1_i32), IVec2::ONE];

        DELTA_CANDIDATES
            .iter()
            .map(|delta_candidate| sand + *delta_candidate)
            .find(|sand_candidate| {
                self.cells
                    .get(*sand_candidate)
                    .copied()
                    .unwrap_or(SandCell::Air)
                    == SandCell::Air
            })
    }

    fn add_sand_unit(&mut self) -> Result<(), AddSandError> {
        use AddSandError::*;

        if self.cells.get(self.source) == Some(&SandCell::Sand) {
            return Err(SourceBlocked);
        }

        let mut sand: IVec2 = self.source;

        while let Some(new_sand) = self.step(sand) {
            if self.cells.get(new_sand).is_none() {
                return Err(FellOutOfBounds);
            }

            sand = new_sand;
        }

        *self.cells.get_mut(sand).unwrap() = SandCell::Sand;

        Ok(())
    }

    /// Adds sand until a unit falls past the deepest rock (no floor) or the source clogs (floor),
    /// returning the count of units that came to rest.
    fn add_all_sand_units(&mut self) -> (usize, AddSandError) {
        let mut units: usize = 0_usize;

        loop {
            match self.add_sand_unit() {
                Ok(()) => units += 1_usize,
                Err(add_sand_error) => return (units, add_sand_error),
            }
        }
    }

    fn string(&self) -> String {
        let dimensions: IVec2 = self.cells.dimensions();
        let mut string: String = String::with_capacity(((dimensions.x + 1_i32) * dimensions.y) as usize);

        for y in 0_i32..dimensions.y {
            for x in 0_i32..dimensions.x {
                let pos: IVec2 = IVec2::new(x, y);

                string.push(match self.cells.get(pos).unwrap() {
                    SandCell::Air if pos == self.source => '+',
                    SandCell::Air => '.',
                    SandCell::Rock => '#',
                    SandCell::Sand => 'o',
                });
            }

            string.push('\n');
        }

        string
    }
}

#[derive(Debug, PartialEq)]
pub enum ScanParseError<'i> {
    FailedToParse(Err<Error<&'i str>>),
    InvalidSegment { from: IVec2, to: IVec2 },
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<Vec<IVec2>>);

impl Solution {
    fn parse_point<'i>(input: &'i str) -> IResult<&'i str, IVec2> {
        map(
            separated_pair(parse_integer::<i32>, tag(","), parse_integer::<i32>),
            |(x, y)| IVec2::new(x, y),
        )(input)
    }

    fn parse_path<'i>(input: &'i str) -> IResult<&'i str, Vec<IVec2>> {
        separated_list1(tag(" -> "), Self::parse_point)(input)
    }

    /// Builds the simulation grid. Sand spreads at most one column per row, so a chamber
    /// `max_y + 3` rows tall and twice that wide (centered on the source) contains every
    /// reachable cell; rock outside that cone can never be touched and is dropped.
    fn sand_grid(&self, with_floor: bool) -> SandGrid {
        let max_y: i32 = self
            .0
            .iter()
            .flatten()
            .map(|point| point.y)
            .max()
            .unwrap_or(0_i32);
        let height: i32 = max_y + 3_i32;
        let offset: IVec2 = IVec2::new(SAND_SOURCE.x - height, 0_i32);
        let dimensions: IVec2 = IVec2::new(2_i32 * height + 1_i32, height);
        let mut cells: Grid2D<SandCell> = Grid2D::try_from_cells_and_dimensions(
            vec![SandCell::Air; (dimensions.x * dimensions.y) as usize],
            dimensions,
        )
        .unwrap();

        for path in self.0.iter() {
            for segment in path.windows(2_usize) {
                for pos in
                    CellIter2D::try_from(segment[0_usize] - offset..=segment[1_usize] - offset)
                        .unwrap()
                {
                    if let Some(cell) = cells.get_mut(pos) {
                        *cell = SandCell::Rock;
                    }
                }
            }
        }

        if with_floor {
            let floor_y: i32 = dimensions.y - 1_i32;

            for x in 0_i32..dimensions.x {
                *cells.get_mut(IVec2::new(x, floor_y)).unwrap() = SandCell::Rock;
            }
        }

        SandGrid {
            cells,
            source: SAND_SOURCE - offset,
        }
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, args: &QuestionArgs) {
        let mut sand_grid: SandGrid = self.sand_grid(false);

        dbg!(sand_grid.add_all_sand_units());

        if args.verbose {
            println!("sand_grid:\n{}", sand_grid.string());
        }
    }

    fn q2_internal(&mut self, args: &QuestionArgs) {
        let mut sand_grid: SandGrid = self.sand_grid(true);

        dbg!(sand_grid.add_all_sand_units());

        if args.verbose {
            println!("sand_grid:\n{}", sand_grid.string());
        }
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = ScanParseError<'i>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        use ScanParseError::*;

        let paths: Vec<Vec<IVec2>> =
            many0(terminated(Self::parse_path, opt(line_ending)))(input)
                .map_err(FailedToParse)?
                .1;

        for path in paths.iter() {
            for segment in path.windows(2_usize) {
                let delta: IVec2 = segment[1_usize] - segment[0_usize];

                if delta == IVec2::ZERO || (delta.x != 0_i32 && delta.y != 0_i32) {
                    return Err(InvalidSegment {
                        from: segment[0_usize],
                        to: segment[1_usize],
                    });
                }
            }
        }

        Ok(Self(paths))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &str = "\
        498,4 -> 498,6 -> 496,6\n\
        503,4 -> 502,4 -> 502,9 -> 494,9\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_solution_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.len(), 2_usize);
        assert_eq!(
            solution.0.first(),
            Some(&vec![
                IVec2::new(498_i32, 4_i32),
                IVec2::new(498_i32, 6_i32),
                IVec2::new(496_i32, 6_i32),
            ])
        );
        assert_eq!(
            Solution::try_from("510,0 -> 512,2"),
            Err(ScanParseError::InvalidSegment {
                from: IVec2::new(510_i32, 0_i32),
                to: IVec2::new(512_i32, 2_i32),
            })
        );
    }

    #[test]
    fn test_sand_grid_string() {
        let sand_grid: SandGrid = solution().sand_grid(false);
        let string: String = sand_grid.string();
        let lines: Vec<&str> = string.lines().collect();

        assert_eq!(lines.len(), 12_usize);
        assert_eq!(
            lines[0_usize].chars().nth(sand_grid.source.x as usize),
            Some('+')
        );
        assert_eq!(string.matches('#').count(), 20_usize);
    }

    #[test]
    fn test_add_all_sand_units_without_floor() {
        let mut sand_grid: SandGrid = solution().sand_grid(false);
        let (units, add_sand_error): (usize, AddSandError) = sand_grid.add_all_sand_units();

        assert_eq!(units, 24_usize);
        assert_eq!(add_sand_error, AddSandError::FellOutOfBounds);
        assert_eq!(sand_grid.string().matches('o').count(), 24_usize);
    }

    #[test]
    fn test_add_all_sand_units_with_floor() {
        assert_eq!(
            solution().sand_grid(true).add_all_sand_units(),
            (93_usize, AddSandError::SourceBlocked)
        );
    }
}
