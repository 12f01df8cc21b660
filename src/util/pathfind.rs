use {
    super::*,
    bitvec::prelude::*,
    glam::IVec2,
    std::{
        cmp::Ordering,
        collections::{BinaryHeap, VecDeque},
    },
    strum::IntoEnumIterator,
};

/// Sentinel distance for cells the search hasn't reached. Using the maximum value keeps the
/// distance domain totally ordered, so no `Option` is needed around priority keys.
pub const UNDISCOVERED: u32 = u32::MAX;

#[derive(Debug, PartialEq)]
pub enum PathfindError {
    EmptyGrid,
    InvalidStart(IVec2),
    InvalidEnd(IVec2),
    NoRouteFound { start: IVec2, end: IVec2 },
}

/// An element of the open set heap: an estimated total cost paired with a row-major cell index.
///
/// `Ord` is reversed so that `BinaryHeap` pops the minimal cost first, with the cell index as a
/// deterministic tie breaker. The heap may contain multiple entries for one cell; all but the
/// cheapest are stale by the time they're popped, and get filtered out by the visited set.
#[derive(Clone, Copy, Eq, PartialEq)]
struct OpenSetEntry {
    cost: u32,
    index: u32,
}

impl Ord for OpenSetEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenSetEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs A* over a grid with unit step costs and the Manhattan distance to `end` as the heuristic,
/// which is admissible for 4-connected unit-cost grids.
///
/// `step_allowed` receives the cell being left and the cell being entered, in that order. On
/// success the full path is returned, `start` and `end` inclusive.
pub fn find_shortest_path<T, F: Fn(&T, &T) -> bool>(
    grid: &Grid2D<T>,
    start: IVec2,
    end: IVec2,
    step_allowed: F,
) -> Result<Vec<IVec2>, PathfindError> {
    use PathfindError::*;

    if grid.cells().is_empty() {
        return Err(EmptyGrid);
    }

    let start_index: usize = grid.try_index_from_pos(start).ok_or(InvalidStart(start))?;

    grid.try_index_from_pos(end).ok_or(InvalidEnd(end))?;

    let area: usize = grid.area();
    let mut costs: Vec<u32> = vec![UNDISCOVERED; area];
    let mut predecessors: Vec<Option<Direction>> = vec![None; area];
    let mut visited: BitVec = bitvec![0; area];
    let mut open_set: BinaryHeap<OpenSetEntry> = BinaryHeap::new();

    costs[start_index] = 0_u32;
    open_set.push(OpenSetEntry {
        cost: manhattan_distance_2d(start, end) as u32,
        index: start_index as u32,
    });

    while let Some(open_set_entry) = open_set.pop() {
        let index: usize = open_set_entry.index as usize;

        if visited[index] {
            // A cheaper entry for this cell was already popped.
            continue;
        }

        visited.set(index, true);

        let pos: IVec2 = grid.pos_from_index(index);

        if pos == end {
            return Ok(reconstruct_path(grid, &costs, &predecessors, end));
        }

        let next_cost: u32 = costs[index] + 1_u32;

        for dir in Direction::iter() {
            let neighbor_pos: IVec2 = pos + dir.vec();

            if let Some(neighbor_index) = grid.try_index_from_pos(neighbor_pos) {
                if !visited[neighbor_index]
                    && step_allowed(&grid.cells()[index], &grid.cells()[neighbor_index])
                    && next_cost < costs[neighbor_index]
                {
                    costs[neighbor_index] = next_cost;
                    predecessors[neighbor_index] = Some(dir.rev());
                    open_set.push(OpenSetEntry {
                        cost: next_cost + manhattan_distance_2d(neighbor_pos, end) as u32,
                        index: neighbor_index as u32,
                    });
                }
            }
        }
    }

    Err(NoRouteFound { start, end })
}

fn reconstruct_path<T>(
    grid: &Grid2D<T>,
    costs: &[u32],
    predecessors: &[Option<Direction>],
    end: IVec2,
) -> Vec<IVec2> {
    let mut path: Vec<IVec2> = Vec::with_capacity(costs[grid.index_from_pos(end)] as usize + 1_usize);
    let mut pos: IVec2 = end;

    path.push(pos);

    while let Some(predecessor) = predecessors[grid.index_from_pos(pos)] {
        pos += predecessor.vec();
        path.push(pos);
    }

    path.reverse();

    path
}

/// Single-source BFS over a grid with unit step costs, returning the full distance map.
///
/// Unreachable cells keep the `UNDISCOVERED` sentinel. Multi-source "best start" queries are
/// answered by running this from the common goal with the step rule reversed and taking the
/// minimum over candidate start cells.
pub fn breadth_first_distances<T, F: Fn(&T, &T) -> bool>(
    grid: &Grid2D<T>,
    start: IVec2,
    step_allowed: F,
) -> Result<Grid2D<u32>, PathfindError> {
    use PathfindError::*;

    if grid.cells().is_empty() {
        return Err(EmptyGrid);
    }

    let start_index: usize = grid.try_index_from_pos(start).ok_or(InvalidStart(start))?;

    let mut distances: Grid2D<u32> =
        Grid2D::try_from_cells_and_dimensions(vec![UNDISCOVERED; grid.area()], grid.dimensions())
            .unwrap();

    distances.cells_mut()[start_index] = 0_u32;

    let mut queue: VecDeque<IVec2> = VecDeque::new();

    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        let index: usize = grid.index_from_pos(pos);
        let next_distance: u32 = distances.cells()[index] + 1_u32;

        for dir in Direction::iter() {
            let neighbor_pos: IVec2 = pos + dir.vec();

            if let Some(neighbor_index) = grid.try_index_from_pos(neighbor_pos) {
                if distances.cells()[neighbor_index] == UNDISCOVERED
                    && step_allowed(&grid.cells()[index], &grid.cells()[neighbor_index])
                {
                    distances.cells_mut()[neighbor_index] = next_distance;
                    queue.push_back(neighbor_pos);
                }
            }
        }
    }

    Ok(distances)
}

/// BFS over an implicit graph addressed by `0_usize..vertex_count`.
///
/// `neighbors` appends into the scratch `Vec` it's handed; the caller drains it between visits.
/// Unreachable vertices keep the `UNDISCOVERED` sentinel.
pub fn breadth_first_graph_distances<N: Fn(usize, &mut Vec<usize>)>(
    vertex_count: usize,
    start: usize,
    neighbors: N,
) -> Vec<u32> {
    let mut distances: Vec<u32> = vec![UNDISCOVERED; vertex_count];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut neighbor_vertices: Vec<usize> = Vec::new();

    if start < vertex_count {
        distances[start] = 0_u32;
        queue.push_back(start);
    }

    while let Some(vertex) = queue.pop_front() {
        let next_distance: u32 = distances[vertex] + 1_u32;

        neighbors(vertex, &mut neighbor_vertices);

        for neighbor_vertex in neighbor_vertices.drain(..) {
            if distances[neighbor_vertex] == UNDISCOVERED {
                distances[neighbor_vertex] = next_distance;
                queue.push_back(neighbor_vertex);
            }
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        rand::{rngs::SmallRng, Rng, SeedableRng},
    };

    fn small_climb(from: &u8, to: &u8) -> bool {
        *to <= *from + 1_u8
    }

    fn height_grid(cells: &[u8], dimensions: IVec2) -> Grid2D<u8> {
        Grid2D::try_from_cells_and_dimensions(cells.to_vec(), dimensions).unwrap()
    }

    #[test]
    fn test_find_shortest_path_detours() {
        let grid: Grid2D<u8> = height_grid(
            &[1_u8, 2_u8, 3_u8, 2_u8, 9_u8, 4_u8, 1_u8, 2_u8, 3_u8],
            IVec2::new(3_i32, 3_i32),
        );
        let path: Vec<IVec2> = find_shortest_path(
            &grid,
            IVec2::ZERO,
            IVec2::new(2_i32, 2_i32),
            small_climb,
        )
        .unwrap();

        // Four steps: the center cell is too tall to enter.
        assert_eq!(path.len(), 5_usize);
        assert_eq!(path.first().copied(), Some(IVec2::ZERO));
        assert_eq!(path.last().copied(), Some(IVec2::new(2_i32, 2_i32)));

        for window in path.windows(2_usize) {
            assert_eq!(manhattan_distance_2d(window[0_usize], window[1_usize]), 1_i32);
            assert!(small_climb(
                grid.get(window[0_usize]).unwrap(),
                grid.get(window[1_usize]).unwrap()
            ));
        }
    }

    #[test]
    fn test_find_shortest_path_errors() {
        let grid: Grid2D<u8> = height_grid(
            &[0_u8, 9_u8, 0_u8, 0_u8, 9_u8, 0_u8, 0_u8, 9_u8, 0_u8],
            IVec2::new(3_i32, 3_i32),
        );

        assert_eq!(
            find_shortest_path(&grid, IVec2::ZERO, IVec2::new(2_i32, 0_i32), small_climb),
            Err(PathfindError::NoRouteFound {
                start: IVec2::ZERO,
                end: IVec2::new(2_i32, 0_i32)
            })
        );
        assert_eq!(
            find_shortest_path(&grid, IVec2::NEG_ONE, IVec2::ZERO, small_climb),
            Err(PathfindError::InvalidStart(IVec2::NEG_ONE))
        );
        assert_eq!(
            find_shortest_path(&grid, IVec2::ZERO, IVec2::new(3_i32, 0_i32), small_climb),
            Err(PathfindError::InvalidEnd(IVec2::new(3_i32, 0_i32)))
        );
        assert_eq!(
            find_shortest_path(
                &Grid2D::<u8>::empty(IVec2::ZERO),
                IVec2::ZERO,
                IVec2::ZERO,
                small_climb
            ),
            Err(PathfindError::EmptyGrid)
        );
    }

    #[test]
    fn test_find_shortest_path_trivial() {
        let grid: Grid2D<u8> = height_grid(&[1_u8], IVec2::ONE);

        assert_eq!(
            find_shortest_path(&grid, IVec2::ZERO, IVec2::ZERO, small_climb),
            Ok(vec![IVec2::ZERO])
        );
    }

    #[test]
    fn test_a_star_matches_bfs_on_random_grids() {
        const DIMENSIONS: IVec2 = IVec2::new(12_i32, 9_i32);

        let mut rng: SmallRng = SmallRng::seed_from_u64(0xA57A_u64);

        for _ in 0_usize..64_usize {
            let cells: Vec<u8> = (0_usize..(DIMENSIONS.x * DIMENSIONS.y) as usize)
                .map(|_| rng.gen_range(0_u8..6_u8))
                .collect();
            let grid: Grid2D<u8> = Grid2D::try_from_cells_and_dimensions(cells, DIMENSIONS).unwrap();
            let start: IVec2 = IVec2::ZERO;
            let end: IVec2 = grid.max_dimensions();
            let distances: Grid2D<u32> =
                breadth_first_distances(&grid, start, small_climb).unwrap();
            let bfs_distance: u32 = *distances.get(end).unwrap();

            match find_shortest_path(&grid, start, end, small_climb) {
                Ok(path) => {
                    assert_eq!(path.len() as u32 - 1_u32, bfs_distance);

                    for window in path.windows(2_usize) {
                        assert!(small_climb(
                            grid.get(window[0_usize]).unwrap(),
                            grid.get(window[1_usize]).unwrap()
                        ));
                    }
                }
                Err(PathfindError::NoRouteFound { .. }) => {
                    assert_eq!(bfs_distance, UNDISCOVERED);
                }
                Err(error) => panic!("unexpected error: {error:?}"),
            }
        }
    }

    #[test]
    fn test_manhattan_heuristic_is_admissible() {
        const DIMENSIONS: IVec2 = IVec2::new(10_i32, 10_i32);

        let mut rng: SmallRng = SmallRng::seed_from_u64(0xADA1_u64);

        for _ in 0_usize..32_usize {
            let cells: Vec<u8> = (0_usize..(DIMENSIONS.x * DIMENSIONS.y) as usize)
                .map(|_| rng.gen_range(0_u8..4_u8))
                .collect();
            let grid: Grid2D<u8> = Grid2D::try_from_cells_and_dimensions(cells, DIMENSIONS).unwrap();
            let start: IVec2 = IVec2::ZERO;
            let distances: Grid2D<u32> =
                breadth_first_distances(&grid, start, small_climb).unwrap();

            for pos in grid.iter_positions() {
                let distance: u32 = *distances.get(pos).unwrap();

                if distance != UNDISCOVERED {
                    assert!(manhattan_distance_2d(start, pos) as u32 <= distance);
                }
            }
        }
    }

    #[test]
    fn test_breadth_first_graph_distances() {
        // 0 - 1 - 2, 3 isolated
        let adjacency: [&[usize]; 4_usize] = [&[1_usize], &[0_usize, 2_usize], &[1_usize], &[]];
        let distances: Vec<u32> =
            breadth_first_graph_distances(4_usize, 0_usize, |vertex, neighbors| {
                neighbors.extend_from_slice(adjacency[vertex]);
            });

        assert_eq!(distances, vec![0_u32, 1_u32, 2_u32, UNDISCOVERED]);
    }
}
