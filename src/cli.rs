use crate::constraint::DEFAULT_SCALE;
use crate::image::decomposer::DEFAULT_MAX_SIDE;
use crate::image::quantizer::{AlphaMode, DEFAULT_STEP};
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_files_argument(command);
        let command = Self::register_output_directory_argument(command);
        let command = Self::register_step_argument(command);
        let command = Self::register_alpha_mode_argument(command);
        let command = Self::register_exclude_background_argument(command);
        let command = Self::register_scale_argument(command);
        let command = Self::register_max_side_argument(command);
        Self::register_threads_argument(command)
    }

    fn register_input_files_argument(command: Command) -> Command {
        command.arg(Self::create_input_files_argument())
    }

    fn register_output_directory_argument(command: Command) -> Command {
        command.arg(Self::create_output_directory_argument())
    }

    fn register_step_argument(command: Command) -> Command {
        command.arg(Self::create_step_argument())
    }

    fn register_alpha_mode_argument(command: Command) -> Command {
        command.arg(Self::create_alpha_mode_argument())
    }

    fn register_exclude_background_argument(command: Command) -> Command {
        command.arg(Self::create_exclude_background_argument())
    }

    fn register_scale_argument(command: Command) -> Command {
        command.arg(Self::create_scale_argument())
    }

    fn register_max_side_argument(command: Command) -> Command {
        command.arg(Self::create_max_side_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_files_argument() -> Arg {
        Arg::new("input_files")
            .help("Paths to PPM (P3) input files")
            .value_parser(value_parser!(PathBuf))
            .action(ArgAction::Append)
            .num_args(1..)
            .required(true)
    }

    fn create_output_directory_argument() -> Arg {
        arg!(output_directory: -o --output_directory <DIR> "Directory for the .rects output files")
            .value_parser(value_parser!(PathBuf))
            .required(false)
    }

    fn create_step_argument() -> Arg {
        arg!(step: -s --step <STEP> "Quantization step per color channel")
            .default_value(DEFAULT_STEP.to_string())
            .value_parser(value_parser!(u16).range(1..=255))
    }

    fn create_alpha_mode_argument() -> Arg {
        arg!(alpha_mode: -a --alpha_mode <MODE> "Treatment of the alpha channel")
            .default_value("Continuous")
            .value_parser(value_parser!(AlphaMode))
    }

    fn create_exclude_background_argument() -> Arg {
        arg!(exclude_background: -x --exclude_background "Replace background rectangles by one canvas rectangle")
    }

    fn create_scale_argument() -> Arg {
        arg!(scale: -m --scale <SCALE> "Output units per grid cell")
            .default_value(DEFAULT_SCALE.to_string())
            .value_parser(value_parser!(f64))
    }

    fn create_max_side_argument() -> Arg {
        arg!(max_side: --max_side <CELLS> "Largest accepted image width or height")
            .default_value(DEFAULT_MAX_SIDE.to_string())
            .value_parser(value_parser!(usize))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_files: Self::extract_input_files_argument(matches),
            output_directory: Self::extract_output_directory_argument(matches),
            quantization_step: Self::extract_step_argument(matches),
            alpha_mode: Self::extract_alpha_mode_argument(matches),
            exclude_background: Self::extract_exclude_background_argument(matches),
            scale: Self::extract_scale_argument(matches),
            max_side: Self::extract_max_side_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
        }
    }

    fn extract_input_files_argument(matches: &ArgMatches) -> Vec<PathBuf> {
        matches
            .get_many::<PathBuf>("input_files")
            .expect("Required argument input_files not provided")
            .cloned()
            .collect()
    }

    fn extract_output_directory_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("output_directory").cloned()
    }

    fn extract_step_argument(matches: &ArgMatches) -> u16 {
        matches
            .get_one::<u16>("step")
            .expect("Quantization step must be provided, but was unset.")
            .to_owned()
    }

    fn extract_alpha_mode_argument(matches: &ArgMatches) -> AlphaMode {
        matches
            .get_one::<AlphaMode>("alpha_mode")
            .expect("Alpha mode must be provided, but was unset.")
            .to_owned()
    }

    fn extract_exclude_background_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("exclude_background")
    }

    fn extract_scale_argument(matches: &ArgMatches) -> f64 {
        matches
            .get_one::<f64>("scale")
            .expect("Scale must be provided, but was unset.")
            .to_owned()
    }

    fn extract_max_side_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("max_side")
            .expect("Maximum side length must be provided, but was unset.")
            .to_owned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, Command};

    use super::{AlphaMode, CLIParser};
    use crate::image::quantizer::DEFAULT_BACKGROUND_THRESHOLD;

    const PROGRAM_NAME_ARGUMENT: &str = "test_program_name";

    #[test]
    fn parse_input_files_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_input_files_argument(command);
        let matches =
            command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "first.ppm", "second.ppm"]);
        let input_files = CLIParser::extract_input_files_argument(&matches);
        assert_eq!(input_files.len(), 2);
        assert_eq!(input_files[1].file_name().unwrap(), "second.ppm");
    }

    #[test]
    fn parse_output_directory_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_output_directory_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-o", "/tmp/out"]);
        let output_directory = CLIParser::extract_output_directory_argument(&matches);
        assert_eq!(output_directory.unwrap().to_str().unwrap(), "/tmp/out");
    }

    #[test]
    fn parse_step_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_step_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--step", "32"]);
        assert_eq!(CLIParser::extract_step_argument(&matches), 32);
    }

    #[test]
    fn parse_step_illegal_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_step_argument(command);
        let result = command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--step", "0"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::ValueValidation);
        } else {
            panic!("Illegal value for step not detected");
        }
    }

    #[test]
    fn parse_alpha_mode_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_alpha_mode_argument(command);
        let matches =
            command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--alpha_mode", "Background"]);
        let actual = CLIParser::extract_alpha_mode_argument(&matches);
        let expected = AlphaMode::Background {
            threshold: DEFAULT_BACKGROUND_THRESHOLD,
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn parse_alpha_mode_illegal_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_alpha_mode_argument(command);
        let result =
            command.try_get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--alpha_mode", "Fuzzy"]);
        if let Err(error) = result {
            assert_eq!(error.kind(), ErrorKind::InvalidValue);
        } else {
            panic!("Illegal value for alpha_mode not detected");
        }
    }

    #[test]
    fn parse_exclude_background_flag() {
        let command = Command::new("test");
        let command = CLIParser::register_exclude_background_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-x"]);
        assert!(CLIParser::extract_exclude_background_argument(&matches));
    }

    #[test]
    fn parse_scale_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_scale_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "-m", "0.5"]);
        assert_eq!(CLIParser::extract_scale_argument(&matches), 0.5);
    }

    #[test]
    fn parse_number_of_threads_argument() {
        let command = Command::new("test");
        let command = CLIParser::register_threads_argument(command);
        let matches = command.get_matches_from(vec![PROGRAM_NAME_ARGUMENT, "--threads", "5"]);
        let actual = CLIParser::extract_threads_argument(&matches);
        let expected = 5;
        assert_eq!(actual, expected);
    }

    #[test]
    fn parse_required_arguments_only() {
        let input_file_name = "inputfile.ppm";
        let input_file_path = format!("/input_directory/{}", input_file_name);
        let mut cli_parser = CLIParser::default();
        let arguments = cli_parser.parse(vec![PROGRAM_NAME_ARGUMENT, &input_file_path, "-t", "8"]);
        assert_eq!(
            arguments.input_files[0].file_name().unwrap(),
            input_file_name,
            "input file does not match"
        );
        assert!(
            arguments.output_directory.is_none(),
            "output directory should be unset"
        );
        assert_eq!(arguments.quantization_step, 16, "step does not match");
        assert_eq!(
            arguments.alpha_mode,
            AlphaMode::Continuous,
            "alpha_mode does not match"
        );
        assert!(!arguments.exclude_background, "exclude_background is set");
        assert_eq!(arguments.scale, 0.1, "scale does not match");
        assert_eq!(arguments.max_side, 512, "max_side does not match");
        assert_eq!(
            arguments.number_of_threads, 8,
            "number_of_threads does not match"
        );
    }
}
