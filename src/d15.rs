use {
    crate::*,
    glam::IVec2,
    nom::{
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::{map, opt},
        error::Error,
        multi::many0,
        sequence::{preceded, terminated, tuple},
        Err, IResult,
    },
    rayon::iter::{IntoParallelIterator, ParallelIterator},
    std::collections::HashSet,
};

#[derive(Clone, Copy, Debug, PartialEq)]
struct SensorReading {
    sensor: IVec2,
    beacon: IVec2,

    /// Cached Manhattan distance between `sensor` and `beacon`.
    radius: i32,
}

impl SensorReading {
    fn new(sensor: IVec2, beacon: IVec2) -> Self {
        Self {
            sensor,
            beacon,
            radius: manhattan_distance_2d(sensor, beacon),
        }
    }

    /// The closed x-interval of row `y` that's within `radius` of the sensor, if any.
    fn row_coverage(&self, y: i32) -> Option<Interval> {
        let half_width: i32 = self.radius - (self.sensor.y - y).abs();

        (half_width >= 0_i32).then(|| {
            Interval::try_new(
                (self.sensor.x - half_width) as i64,
                (self.sensor.x + half_width) as i64,
            )
            .unwrap()
        })
    }
}

impl Parse for SensorReading {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                preceded(tag("Sensor at x="), parse_integer::<i32>),
                preceded(tag(", y="), parse_integer::<i32>),
                preceded(tag(": closest beacon is at x="), parse_integer::<i32>),
                preceded(tag(", y="), parse_integer::<i32>),
            )),
            |(sensor_x, sensor_y, beacon_x, beacon_y)| {
                Self::new(
                    IVec2::new(sensor_x, sensor_y),
                    IVec2::new(beacon_x, beacon_y),
                )
            },
        )(input)
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<SensorReading>);

impl Solution {
    const Q1_ROW: i32 = 2_000_000_i32;
    const Q2_BOUND: i64 = 4_000_000_i64;
    const TUNING_FREQUENCY_X_FACTOR: i64 = 4_000_000_i64;

    fn row_coverage(&self, y: i32) -> Intervals {
        let mut coverage: Intervals = Intervals::new();

        for sensor_reading in self.0.iter() {
            if let Some(interval) = sensor_reading.row_coverage(y) {
                coverage.insert(interval);
            }
        }

        coverage
    }

    fn positions_without_beacon_in_row(&self, y: i32) -> u64 {
        let coverage: Intervals = self.row_coverage(y);

        // Known beacons sitting inside the coverage don't count as impossible positions.
        let beacon_xs_in_row: HashSet<i32> = self
            .0
            .iter()
            .filter(|sensor_reading| sensor_reading.beacon.y == y)
            .map(|sensor_reading| sensor_reading.beacon.x)
            .collect();
        let covered_beacons: u64 = beacon_xs_in_row
            .into_iter()
            .filter(|&x| {
                coverage
                    .iter()
                    .any(|interval| interval.contains(x as i64))
            })
            .count() as u64;

        coverage.covered_len() - covered_beacons
    }

    fn try_find_distress_beacon(&self, bound: i64) -> Option<IVec2> {
        let bounds: Interval = Interval::try_new(0_i64, bound).ok()?;

        // Rows are independent, so scan them in parallel; only one row has a gap.
        (0_i32..=bound as i32).into_par_iter().find_map_any(|y| {
            self.row_coverage(y)
                .find_single_gap(bounds)
                .map(|x| IVec2::new(x as i32, y))
        })
    }

    fn try_tuning_frequency(&self, bound: i64) -> Option<i64> {
        self.try_find_distress_beacon(bound)
            .map(|pos| pos.x as i64 * Self::TUNING_FREQUENCY_X_FACTOR + pos.y as i64)
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many0(terminated(SensorReading::parse, opt(line_ending))),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.positions_without_beacon_in_row(Self::Q1_ROW));
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.try_tuning_frequency(Self::Q2_BOUND));
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

    const SOLUTION_STR: &str = "\
        Sensor at x=2, y=18: closest beacon is at x=-2, y=15\n\
        Sensor at x=9, y=16: closest beacon is at x=10, y=16\n\
        Sensor at x=13, y=2: closest beacon is at x=15, y=3\n\
        Sensor at x=12, y=14: closest beacon is at x=10, y=16\n\
        Sensor at x=10, y=20: closest beacon is at x=10, y=16\n\
        Sensor at x=14, y=17: closest beacon is at x=10, y=16\n\
        Sensor at x=8, y=7: closest beacon is at x=2, y=10\n\
        Sensor at x=2, y=0: closest beacon is at x=2, y=10\n\
        Sensor at x=0, y=11: closest beacon is at x=2, y=10\n\
        Sensor at x=20, y=14: closest beacon is at x=25, y=17\n\
        Sensor at x=17, y=20: closest beacon is at x=21, y=22\n\
        Sensor at x=16, y=7: closest beacon is at x=15, y=3\n\
        Sensor at x=14, y=3: closest beacon is at x=15, y=3\n\
        Sensor at x=20, y=1: closest beacon is at x=15, y=3\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_solution_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.len(), 14_usize);
        assert_eq!(
            solution.0.first().copied(),
            Some(SensorReading::new(
                IVec2::new(2_i32, 18_i32),
                IVec2::new(-2_i32, 15_i32)
            ))
        );
        assert_eq!(solution.0[6_usize].radius, 9_i32);
    }

    #[test]
    fn test_row_coverage() {
        // Row 10 of the example is covered by a single run of 27 positions, one of which holds a
        // beacon.
        let coverage: Intervals = solution().row_coverage(10_i32);

        assert_eq!(coverage.covered_len(), 27_u64);
        assert_eq!(solution().positions_without_beacon_in_row(10_i32), 26_u64);
    }

    #[test]
    fn test_try_find_distress_beacon() {
        assert_eq!(
            solution().try_find_distress_beacon(20_i64),
            Some(IVec2::new(14_i32, 11_i32))
        );
        assert_eq!(
            solution().try_tuning_frequency(20_i64),
            Some(56000011_i64)
        );
    }
}
