use dancing_links::{solve_many, Strategy, SubsetProblem};

fn main() {
    env_logger::init();

    let mut prob = SubsetProblem::default();
    prob.add_constraints(1..=7);
    prob.add_subset("A", vec![3, 5, 6]);
    prob.add_subset("B", vec![1, 4, 7]);
    prob.add_subset("C", vec![2, 3, 6]);
    prob.add_subset("D", vec![1, 4]);
    prob.add_subset("E", vec![2, 7]);
    prob.add_subset("F", vec![4, 5, 7]);

    let solutions = solve_many(&prob, Strategy::MinimumSize, None).unwrap();
    for solution in &solutions {
        println!("{:?}", solution.rows());
    }
}
