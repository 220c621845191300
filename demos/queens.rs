use dancing_links::problems::queens::Queens;
use dancing_links::{solve_first, solve_many, Strategy};

fn main() {
    env_logger::init();

    let queens = Queens::new(8);
    let first = solve_first(&queens, Strategy::MinimumSize)
        .unwrap()
        .expect("the 8-queens puzzle has solutions");

    let mut board = [["."; 8]; 8];
    for placement in first.rows() {
        board[placement.rank][placement.file] = "Q";
    }
    for rank in board {
        println!("{}", rank.join(" "));
    }

    let total = solve_many(&queens, Strategy::MinimumSize, None).unwrap().len();
    println!("\n{} solutions in total", total);
}
