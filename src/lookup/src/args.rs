use clap::Parser;

use crate::api::DEFAULT_MAPPING_URL;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Name of the packaging team to look up
    #[arg(value_name = "TEAM")]
    pub team: String,

    /// Url of the team to package mapping document
    #[arg(long, default_value = DEFAULT_MAPPING_URL)]
    pub url: String,
}
