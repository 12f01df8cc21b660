use {
    crate::*,
    nom::{
        character::complete::{line_ending, one_of},
        combinator::{all_consuming, map, opt},
        error::Error,
        multi::many1,
        sequence::terminated,
        Err, IResult,
    },
    std::{collections::HashMap, mem::transmute},
    strum::EnumCount,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Jet {
    Left,
    Right,
}

/// Rock rows are 7-bit masks, bottom row first, with bit `6 - x` set for column `x`. A rock spawns
/// with its left edge in column 2 and its bottom row three rows above the stack.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug, EnumCount, PartialEq)]
#[repr(usize)]
enum RockShape {
    HorizontalLine,
    Plus,
    RightAngle,
    VerticalLine,
    Square,
}

impl RockShape {
    const ROWS: [&'static [u8]; Self::COUNT] = [
        &[0b0011110_u8],
        &[0b0001000_u8, 0b0011100_u8, 0b0001000_u8],
        &[0b0011100_u8, 0b0000100_u8, 0b0000100_u8],
        &[0b0010000_u8, 0b0010000_u8, 0b0010000_u8, 0b0010000_u8],
        &[0b0011000_u8, 0b0011000_u8],
    ];
    const MAX_HEIGHT: usize = 4_usize;

    fn from_rock_index(rock_index: u64) -> Self {
        // SAFETY: `RockShape` has `repr(usize)` with variants at values `0_usize` up to (and
        // excluding) `RockShape::COUNT`, and the modulus maps any index into that range
        unsafe { transmute((rock_index % Self::COUNT as u64) as usize) }
    }

    const fn rows(self) -> &'static [u8] {
        Self::ROWS[self as usize]
    }
}

#[derive(Clone, Copy)]
struct FallingRock {
    rows: [u8; RockShape::MAX_HEIGHT],
    height: usize,
}

impl FallingRock {
    const LEFT_WALL_MASK: u8 = 0b1000000_u8;
    const RIGHT_WALL_MASK: u8 = 0b0000001_u8;

    fn try_jet_push(mut self, jet: Jet) -> Option<Self> {
        let wall_mask: u8 = match jet {
            Jet::Left => Self::LEFT_WALL_MASK,
            Jet::Right => Self::RIGHT_WALL_MASK,
        };

        for row in self.rows[..self.height].iter_mut() {
            if *row & wall_mask != 0_u8 {
                return None;
            }

            *row = match jet {
                Jet::Left => *row << 1_u32,
                Jet::Right => *row >> 1_u32,
            };
        }

        Some(self)
    }
}

impl From<RockShape> for FallingRock {
    fn from(rock_shape: RockShape) -> Self {
        let shape_rows: &[u8] = rock_shape.rows();
        let mut falling_rock: Self = Self {
            rows: [0_u8; RockShape::MAX_HEIGHT],
            height: shape_rows.len(),
        };

        falling_rock.rows[..shape_rows.len()].copy_from_slice(shape_rows);

        falling_rock
    }
}

/// Rows above the spawn gap never matter once buried, so a fingerprint of the top `PROFILE_ROWS`
/// rows (plus the shape and jet cursors) identifies a repeating simulation state. 32 rows is far
/// deeper than any column gap these shapes can leave open near the surface.
const PROFILE_ROWS: usize = 32_usize;

struct Chamber<'j> {
    jets: &'j [Jet],
    rows: Vec<u8>,
    jet_index: usize,
    rock_index: u64,
}

type ChamberStateKey = (usize, usize, [u8; PROFILE_ROWS]);

impl<'j> Chamber<'j> {
    fn new(jets: &'j [Jet]) -> Self {
        Self {
            jets,
            rows: Vec::new(),
            jet_index: 0_usize,
            rock_index: 0_u64,
        }
    }

    fn collides(&self, falling_rock: &FallingRock, bottom_y: usize) -> bool {
        falling_rock.rows[..falling_rock.height]
            .iter()
            .enumerate()
            .any(|(row_index, row)| {
                self.rows
                    .get(bottom_y + row_index)
                    .map_or(false, |chamber_row| chamber_row & row != 0_u8)
            })
    }

    fn drop_rock(&mut self) {
        let mut falling_rock: FallingRock =
            RockShape::from_rock_index(self.rock_index).into();
        let mut bottom_y: usize = self.rows.len() + 3_usize;

        loop {
            if let Some(pushed_rock) = falling_rock.try_jet_push(self.jets[self.jet_index]) {
                if !self.collides(&pushed_rock, bottom_y) {
                    falling_rock = pushed_rock;
                }
            }

            self.jet_index = (self.jet_index + 1_usize) % self.jets.len();

            if bottom_y == 0_usize || self.collides(&falling_rock, bottom_y - 1_usize) {
                break;
            }

            bottom_y -= 1_usize;
        }

        if self.rows.len() < bottom_y + falling_rock.height {
            self.rows.resize(bottom_y + falling_rock.height, 0_u8);
        }

        for (row_index, row) in falling_rock.rows[..falling_rock.height].iter().enumerate() {
            self.rows[bottom_y + row_index] |= row;
        }

        self.rock_index += 1_u64;
    }

    fn state_key(&self) -> Option<ChamberStateKey> {
        (self.rows.len() >= PROFILE_ROWS).then(|| {
            let mut profile: [u8; PROFILE_ROWS] = [0_u8; PROFILE_ROWS];

            profile.copy_from_slice(&self.rows[self.rows.len() - PROFILE_ROWS..]);

            (
                (self.rock_index % RockShape::COUNT as u64) as usize,
                self.jet_index,
                profile,
            )
        })
    }
}

pub struct Solution(Vec<Jet>);

impl Solution {
    const Q1_ROCK_COUNT: u64 = 2_022_u64;
    const Q2_ROCK_COUNT: u64 = 1_000_000_000_000_u64;

    /// Simulates until a previously seen state recurs, then extrapolates over whole cycles and
    /// simulates only the remainder.
    fn tower_height(&self, rock_count: u64) -> u64 {
        let mut chamber: Chamber = Chamber::new(&self.0);
        let mut seen_states: HashMap<ChamberStateKey, (u64, u64)> = HashMap::new();
        let mut rocks_dropped: u64 = 0_u64;
        let mut height_added_by_cycles: u64 = 0_u64;

        while rocks_dropped < rock_count {
            chamber.drop_rock();
            rocks_dropped += 1_u64;

            if height_added_by_cycles == 0_u64 {
                if let Some(state_key) = chamber.state_key() {
                    let height: u64 = chamber.rows.len() as u64;

                    if let Some((cycle_start_rocks, cycle_start_height)) =
                        seen_states.insert(state_key, (rocks_dropped, height))
                    {
                        let rocks_per_cycle: u64 = rocks_dropped - cycle_start_rocks;
                        let height_per_cycle: u64 = height - cycle_start_height;
                        let cycles_skipped: u64 = (rock_count - rocks_dropped) / rocks_per_cycle;

                        rocks_dropped += cycles_skipped * rocks_per_cycle;
                        height_added_by_cycles = cycles_skipped * height_per_cycle;
                    }
                }
            }
        }

        chamber.rows.len() as u64 + height_added_by_cycles
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.tower_height(Self::Q1_ROCK_COUNT));
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.tower_height(Self::Q2_ROCK_COUNT));
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            all_consuming(terminated(
                many1(map(one_of("<>"), |jet_char| match jet_char {
                    '<' => Jet::Left,
                    _ => Jet::Right,
                })),
                opt(line_ending),
            )),
            Self,
        )(input)
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &str = ">>><<><>><<<>><>>><<<>>><<<><<<>><>><<>>";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_solution_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.len(), 40_usize);
        assert_eq!(
            solution.0[..4_usize],
            [Jet::Right, Jet::Right, Jet::Right, Jet::Left]
        );
        assert!(Solution::try_from(">>^<<").is_err());
    }

    #[test]
    fn test_drop_rock() {
        let solution: &Solution = solution();
        let mut chamber: Chamber = Chamber::new(&solution.0);
        let mut heights: Vec<usize> = Vec::new();

        for _ in 0_usize..10_usize {
            chamber.drop_rock();
            heights.push(chamber.rows.len());
        }

        assert_eq!(
            heights,
            vec![
                1_usize, 4_usize, 6_usize, 7_usize, 9_usize, 10_usize, 13_usize, 15_usize,
                17_usize, 17_usize
            ]
        );
        assert_eq!(chamber.rows[0_usize], 0b0011110_u8);
    }

    #[test]
    fn test_tower_height() {
        assert_eq!(solution().tower_height(Solution::Q1_ROCK_COUNT), 3_068_u64);
    }

    #[test]
    fn test_tower_height_with_cycle_extrapolation() {
        assert_eq!(
            solution().tower_height(Solution::Q2_ROCK_COUNT),
            1_514_285_714_288_u64
        );
    }
}
