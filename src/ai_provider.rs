use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum AiProvider {
    #[default]
    Gemini,
    Claude,
    Codex,
}

impl AiProvider {
    pub fn command_name(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini",
            AiProvider::Claude => "claude",
            AiProvider::Codex => "codex",
        }
    }
}
