use rand::rngs::StdRng;
use rand::SeedableRng;

use dancing_links::problems::sudoku::Sudoku;

fn main() {
    env_logger::init();

    let puzzle = Sudoku::parse(
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079",
    )
    .expect("the grid string is well formed");

    println!("{}\n", puzzle);
    match puzzle.solve() {
        Some(solved) => println!("{}", solved),
        None => println!("no solution"),
    }

    let mut rng = StdRng::seed_from_u64(2024);
    let generated = Sudoku::random(&mut rng, 32);
    println!("\ngenerated puzzle with 32 clues:\n{}", generated);
}
