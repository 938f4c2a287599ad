use clap::Parser;
use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process,
};

#[derive(Parser)]
#[command(name = "micac")]
#[command(about = "Mica to EVM bytecode compiler", long_about = None)]
#[command(version)]
struct Cli {
    /// Input file (use '-' or omit for stdin)
    input: Option<PathBuf>,

    /// Print the token stream and exit
    #[arg(long)]
    tokens: bool,

    /// Print the parsed syntax tree and exit
    #[arg(long)]
    ast: bool,

    /// Print an assembly listing instead of raw bytecode
    #[arg(long)]
    asm: bool,
}

fn read_input(input: Option<PathBuf>) -> String {
    let use_stdin = match &input {
        None => true,
        Some(path) => path.to_str() == Some("-"),
    };

    if use_stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).expect("failed to read from stdin");
        buffer
    } else {
        let path = input.unwrap();
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read file '{}': {}", path.display(), e))
    }
}

fn exit_with(error: impl std::fmt::Display) -> ! {
    eprintln!("error: {error}");
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let source = read_input(cli.input);

    let tokens = mica_parser::tokenize(&source).unwrap_or_else(|err| exit_with(err));
    if cli.tokens {
        for token in &tokens {
            println!("{token}");
        }
        return;
    }

    let program = mica_parser::parse(&tokens).unwrap_or_else(|err| exit_with(err));
    if cli.ast {
        println!("{program:#?}");
        return;
    }

    let symbols = mica_sema::analyze(&program).unwrap_or_else(|err| exit_with(err));

    if cli.asm {
        let listing =
            mica_asm_backend::emit_assembly(&program, &symbols).unwrap_or_else(|err| exit_with(err));
        for line in listing {
            println!("{line}");
        }
        return;
    }

    let bytecode =
        mica_codegen::emit_bytecode(&program, &symbols).unwrap_or_else(|err| exit_with(err));
    print!("0x");
    for byte in bytecode {
        print!("{byte:02x}");
    }
    println!();
}
