#![no_main]
use crude_csv::Grid;
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(arbitrary::Arbitrary, Debug)]
enum Op {
    AddRow,
    RemoveRow,
    AddColumn,
    RemoveColumn,
    Set { row: u8, column: u8, text: String },
    Clear,
}

#[derive(arbitrary::Arbitrary, Debug)]
struct Input {
    initial: String,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut grid = Grid::parse(&input.initial);
    for op in input.ops {
        let before = grid.clone();
        let result = match op {
            Op::AddRow => grid.add_row(),
            Op::RemoveRow => grid.remove_row(),
            Op::AddColumn => grid.add_column(),
            Op::RemoveColumn => grid.remove_column(),
            Op::Set { row, column, text } => grid.set_cell(row as usize, column as usize, text),
            Op::Clear => {
                grid.clear();
                continue;
            }
        };
        if result.is_err() {
            assert_eq!(grid, before, "refused edit changed the grid");
        }
        assert!(grid.rows().iter().all(|r| r.len() == grid.column_count()));
        if !grid.is_empty() {
            assert!(grid.column_count() >= 1);
        }
    }
});
