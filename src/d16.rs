use {
    crate::*,
    nom::{
        branch::alt,
        bytes::complete::tag,
        character::complete::{line_ending, satisfy},
        combinator::{map, opt},
        error::Error,
        multi::{many0, separated_list1},
        sequence::{preceded, terminated, tuple},
        Err, IResult,
    },
    std::{
        collections::HashMap,
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct ValveName([u8; 2_usize]);

impl ValveName {
    const START: Self = Self(*b"AA");
}

impl Debug for ValveName {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}{}", self.0[0_usize] as char, self.0[1_usize] as char)
    }
}

impl Parse for ValveName {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                satisfy(|c| c.is_ascii_uppercase()),
                satisfy(|c| c.is_ascii_uppercase()),
            )),
            |(a, b)| Self([a as u8, b as u8]),
        )(input)
    }
}

#[derive(Debug, PartialEq)]
struct ValveScan {
    name: ValveName,
    flow_rate: u32,
    tunnels: Vec<ValveName>,
}

impl Parse for ValveScan {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                preceded(tag("Valve "), ValveName::parse),
                preceded(tag(" has flow rate="), parse_integer::<u32>),
                preceded(
                    alt((
                        tag("; tunnels lead to valves "),
                        tag("; tunnel leads to valve "),
                    )),
                    separated_list1(tag(", "), ValveName::parse),
                ),
            )),
            |(name, flow_rate, tunnels)| Self {
                name,
                flow_rate,
                tunnels,
            },
        )(input)
    }
}

#[derive(Debug, PartialEq)]
pub enum ScanParseError<'i> {
    FailedToParse(Err<Error<&'i str>>),
    DuplicateValveName(ValveName),
    UnknownValveName(ValveName),
    NoStartValve,
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution {
    flow_rates: Vec<u32>,
    adjacency: Vec<Vec<usize>>,
    start: usize,
}

impl Solution {
    const Q1_TIME_BUDGET: u8 = 30_u8;
    const Q2_TIME_BUDGET: u8 = 26_u8;

    /// Collapses the tunnel graph to its positive-flow valves: all-pairs travel times between them
    /// plus travel times from `AA`, each computed by a fresh breadth-first pass.
    fn reward_network(&self) -> RewardNetwork {
        let valve_count: usize = self.flow_rates.len();
        let neighbors = |vertex: usize, neighbor_vertices: &mut Vec<usize>| {
            neighbor_vertices.extend_from_slice(&self.adjacency[vertex]);
        };
        let targets: Vec<usize> = (0_usize..valve_count)
            .filter(|&valve| self.flow_rates[valve] > 0_u32)
            .collect();
        let from_start: Vec<u32> =
            breadth_first_graph_distances(valve_count, self.start, neighbors);

        RewardNetwork {
            travel: targets
                .iter()
                .map(|&from| {
                    let distances: Vec<u32> =
                        breadth_first_graph_distances(valve_count, from, neighbors);

                    targets.iter().map(|&to| distances[to]).collect()
                })
                .collect(),
            from_start: targets.iter().map(|&target| from_start[target]).collect(),
            rates: targets
                .iter()
                .map(|&target| self.flow_rates[target])
                .collect(),
        }
    }

    fn max_pressure_released(&self) -> Result<u32, AgentSearchError> {
        optimize_single_agent(&self.reward_network(), Self::Q1_TIME_BUDGET)
    }

    fn max_pressure_released_with_elephant(&self) -> Result<u32, AgentSearchError> {
        optimize_multi_agent(&self.reward_network(), Self::Q2_TIME_BUDGET)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.max_pressure_released());
    }

    /// Teaching the elephant costs four minutes, but two openers more than make up for it.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.max_pressure_released_with_elephant());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = ScanParseError<'i>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        use ScanParseError::*;

        let scans: Vec<ValveScan> =
            many0(terminated(ValveScan::parse, opt(line_ending)))(input)
                .map_err(FailedToParse)?
                .1;
        let mut indices: HashMap<ValveName, usize> = HashMap::with_capacity(scans.len());

        for (index, scan) in scans.iter().enumerate() {
            if indices.insert(scan.name, index).is_some() {
                return Err(DuplicateValveName(scan.name));
            }
        }

        let start: usize = *indices.get(&ValveName::START).ok_or(NoStartValve)?;
        let mut flow_rates: Vec<u32> = Vec::with_capacity(scans.len());
        let mut adjacency: Vec<Vec<usize>> = Vec::with_capacity(scans.len());

        for scan in scans.iter() {
            let mut tunnels: Vec<usize> = Vec::with_capacity(scan.tunnels.len());

            for &tunnel in scan.tunnels.iter() {
                tunnels.push(*indices.get(&tunnel).ok_or(UnknownValveName(tunnel))?);
            }

            flow_rates.push(scan.flow_rate);
            adjacency.push(tunnels);
        }

        Ok(Self {
            flow_rates,
            adjacency,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &str = "\
        Valve AA has flow rate=0; tunnels lead to valves DD, II, BB\n\
        Valve BB has flow rate=13; tunnels lead to valves CC, AA\n\
        Valve CC has flow rate=2; tunnels lead to valves DD, BB\n\
        Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE\n\
        Valve EE has flow rate=3; tunnels lead to valves FF, DD\n\
        Valve FF has flow rate=0; tunnels lead to valves EE, GG\n\
        Valve GG has flow rate=0; tunnels lead to valves FF, HH\n\
        Valve HH has flow rate=22; tunnel leads to valve GG\n\
        Valve II has flow rate=0; tunnels lead to valves AA, JJ\n\
        Valve JJ has flow rate=21; tunnel leads to valve II\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_solution_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.flow_rates.len(), 10_usize);
        assert_eq!(solution.start, 0_usize);
        assert_eq!(solution.adjacency[0_usize], vec![3_usize, 8_usize, 1_usize]);
        assert_eq!(
            Solution::try_from("Valve AA has flow rate=0; tunnel leads to valve ZZ"),
            Err(ScanParseError::UnknownValveName(ValveName(*b"ZZ")))
        );
        assert_eq!(
            Solution::try_from("Valve BB has flow rate=1; tunnel leads to valve BB"),
            Err(ScanParseError::NoStartValve)
        );
        assert_eq!(
            Solution::try_from(
                "Valve AA has flow rate=0; tunnel leads to valve AA\n\
                Valve AA has flow rate=1; tunnel leads to valve AA"
            ),
            Err(ScanParseError::DuplicateValveName(ValveName(*b"AA")))
        );
    }

    #[test]
    fn test_reward_network() {
        let network: RewardNetwork = solution().reward_network();

        // Positive-flow valves, in scan order: BB, CC, DD, EE, HH, JJ.
        assert_eq!(
            network.rates,
            vec![13_u32, 2_u32, 20_u32, 3_u32, 22_u32, 21_u32]
        );
        assert_eq!(
            network.from_start,
            vec![1_u32, 2_u32, 1_u32, 2_u32, 5_u32, 2_u32]
        );
        // BB to HH crosses the whole graph.
        assert_eq!(network.travel[0_usize][4_usize], 6_u32);
    }

    #[test]
    fn test_max_pressure_released() {
        assert_eq!(solution().max_pressure_released(), Ok(1651_u32));
    }

    #[test]
    fn test_max_pressure_released_with_elephant() {
        assert_eq!(
            solution().max_pressure_released_with_elephant(),
            Ok(1707_u32)
        );
    }
}
