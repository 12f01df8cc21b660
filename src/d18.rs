use {
    crate::*,
    glam::IVec3,
    nom::{
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::{map, opt},
        error::Error,
        multi::many0,
        sequence::{terminated, tuple},
        Err, IResult,
    },
    std::collections::HashSet,
};

const NEIGHBOR_DELTAS: [IVec3; 6_usize] = [
    IVec3::X,
    IVec3::NEG_X,
    IVec3::Y,
    IVec3::NEG_Y,
    IVec3::Z,
    IVec3::NEG_Z,
];

pub struct Solution(Vec<IVec3>);

impl Solution {
    fn parse_cube<'i>(input: &'i str) -> IResult<&'i str, IVec3> {
        map(
            tuple((
                parse_integer::<i32>,
                tag(","),
                parse_integer::<i32>,
                tag(","),
                parse_integer::<i32>,
            )),
            |(x, _, y, _, z)| IVec3::new(x, y, z),
        )(input)
    }

    fn surface_area(&self) -> usize {
        let cubes: HashSet<IVec3> = self.0.iter().copied().collect();

        cubes
            .iter()
            .map(|cube| {
                NEIGHBOR_DELTAS
                    .iter()
                    .filter(|delta| !cubes.contains(&(*cube + **delta)))
                    .count()
            })
            .sum()
    }

    /// Counts only faces reachable by steam: a BFS over the air cells of a one-cell-padded
    /// bounding box, seeded at a padded corner, touches every exterior face and no interior
    /// pocket.
    fn exterior_surface_area(&self) -> usize {
        if self.0.is_empty() {
            return 0_usize;
        }

        let min: IVec3 = self
            .0
            .iter()
            .copied()
            .reduce(|acc, cube| acc.min(cube))
            .unwrap()
            - IVec3::ONE;
        let max: IVec3 = self
            .0
            .iter()
            .copied()
            .reduce(|acc, cube| acc.max(cube))
            .unwrap()
            + IVec3::ONE;
        let dimensions: IVec3 = max - min + IVec3::ONE;
        let volume: usize = (dimensions.x * dimensions.y * dimensions.z) as usize;
        let index = |pos: IVec3| {
            let local: IVec3 = pos - min;

            ((local.z * dimensions.y + local.y) * dimensions.x + local.x) as usize
        };
        let in_bounds = |pos: IVec3| pos.cmpge(min).all() && pos.cmple(max).all();
        let mut is_lava: Vec<bool> = vec![false; volume];

        for cube in self.0.iter() {
            is_lava[index(*cube)] = true;
        }

        let steam_distances: Vec<u32> =
            breadth_first_graph_distances(volume, index(min), |vertex, neighbor_vertices| {
                let local: IVec3 = IVec3::new(
                    vertex as i32 % dimensions.x,
                    (vertex as i32 / dimensions.x) % dimensions.y,
                    vertex as i32 / (dimensions.x * dimensions.y),
                );
                let pos: IVec3 = local + min;

                for delta in NEIGHBOR_DELTAS.iter() {
                    let neighbor: IVec3 = pos + *delta;

                    if in_bounds(neighbor) && !is_lava[index(neighbor)] {
                        neighbor_vertices.push(index(neighbor));
                    }
                }
            });

        self.0
            .iter()
            .map(|cube| {
                NEIGHBOR_DELTAS
                    .iter()
                    .filter(|delta| {
                        let neighbor: IVec3 = *cube + **delta;

                        in_bounds(neighbor)
                            && !is_lava[index(neighbor)]
                            && steam_distances[index(neighbor)] != UNDISCOVERED
                    })
                    .count()
            })
            .sum()
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.surface_area());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.exterior_surface_area());
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many0(terminated(Self::parse_cube, opt(line_ending))),
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
