use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    novahub::cli::main()
}
