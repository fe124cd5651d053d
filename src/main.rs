use std::env::args_os;
use std::process::ExitCode;

use pixel_rect_decomposer::{convert_ppm_to_records, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match convert_ppm_to_records(&arguments) {
        Ok(output_files) => {
            for output_file in output_files {
                println!("Wrote {}", output_file.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Conversion failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
