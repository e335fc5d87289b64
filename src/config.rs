use clap::Args as ClapArgs;

const DEFAULT_API_URL: &str = "https://graph.facebook.com";
const OUTPUT_DIR: &str = "./";

#[derive(ClapArgs)]
pub struct Config {
    #[arg(long, default_value=DEFAULT_API_URL, env = "API_URL")]
    pub(crate) api_url: String,

    #[arg(long, env = "ACCESS_TOKEN")]
    pub(crate) access_token: String,

    #[arg(long, default_value=OUTPUT_DIR, env = "OUTPUT_DIR")]
    pub(crate) output_dir: String,
}
