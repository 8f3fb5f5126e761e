use std::io::{self, Write};
use std::process::ExitCode;

use log::{debug, warn};

mod btree;
mod error;
mod node;
mod pager;
mod row;
mod statement;
mod table;

use error::FatalError;
use node::LEAF_NODE_MAX_CELLS;
use statement::Statement;
use table::Table;

type InputBuffer = String;

fn main() -> ExitCode {
    env_logger::init();

    let filename = match std::env::args().nth(1) {
        Some(filename) => filename,
        None => {
            println!("Must supply a database filename");
            return ExitCode::FAILURE;
        }
    };

    let mut table = match Table::open(&filename) {
        Ok(table) => table,
        Err(err) => return fatal(err),
    };

    let mut input_buffer = InputBuffer::new();
    loop {
        print_prompt();
        let bytes_read = match read_input(&mut input_buffer) {
            Ok(n) => n,
            Err(_) => return fatal(FatalError::ReadInput),
        };

        if bytes_read == 0 {
            return fatal(FatalError::ReadInput);
        }

        if input_buffer.starts_with('.') {
            match run_meta_command(&input_buffer, &mut table) {
                MetaCommandResult::Exit => {
                    return match table.close() {
                        Ok(()) => ExitCode::SUCCESS,
                        Err(err) => fatal(err),
                    };
                }
                MetaCommandResult::Handled => continue,
                MetaCommandResult::Unrecognized => {
                    println!("Unrecognized command [{input_buffer}]");
                    continue;
                }
            }
        }

        let statement = match Statement::prepare(&input_buffer) {
            Ok(statement) => statement,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match statement.execute(&mut table) {
            Ok(Ok(())) => println!("Executed"),
            Ok(Err(err)) => println!("{err}"),
            Err(err) => return fatal(err),
        }
    }
}

enum MetaCommandResult {
    Exit,
    Handled,
    Unrecognized,
}

fn run_meta_command(input: &str, table: &mut Table) -> MetaCommandResult {
    match input {
        ".exit" => MetaCommandResult::Exit,
        ".constants" => {
            print_constants();
            MetaCommandResult::Handled
        }
        ".btree" => {
            print_tree(table);
            MetaCommandResult::Handled
        }
        _ => MetaCommandResult::Unrecognized,
    }
}

fn print_constants() {
    println!("ROW_SIZE: {}", row::ROW_SIZE);
    println!("COMMON_NODE_HEADER_SIZE: {}", node::COMMON_NODE_HEADER_SIZE);
    println!("LEAF_NODE_HEADER_SIZE: {}", node::LEAF_NODE_HEADER_SIZE);
    println!("LEAF_NODE_CELL_SIZE: {}", node::LEAF_NODE_CELL_SIZE);
    println!(
        "LEAF_NODE_SPACE_FOR_CELLS: {}",
        node::LEAF_NODE_SPACE_FOR_CELLS
    );
    println!("LEAF_NODE_MAX_CELLS: {LEAF_NODE_MAX_CELLS}");
}

fn print_tree(table: &mut Table) {
    let page_num = table.root_page_num;
    let page = match table.pager.get_page(page_num) {
        Ok(page) => page,
        Err(err) => {
            warn!("could not read page {page_num} for .btree: {err}");
            return;
        }
    };
    let leaf = node::LeafNode::new(page);
    println!("leaf (size {})", leaf.num_cells());
    for i in 0..leaf.num_cells() {
        println!("  - {i} : {}", leaf.key(i));
    }
}

fn fatal(err: FatalError) -> ExitCode {
    println!("{err}");
    ExitCode::FAILURE
}

fn print_prompt() {
    print!("db > ");
    let _ = io::stdout().flush();
}

fn read_input(input_buffer: &mut InputBuffer) -> io::Result<usize> {
    input_buffer.clear();
    let bytes_read = io::stdin().read_line(input_buffer)?;
    let trimmed = input_buffer.trim_end().to_owned();
    debug!("read input: {trimmed:?}");
    *input_buffer = trimmed;
    Ok(bytes_read)
}
