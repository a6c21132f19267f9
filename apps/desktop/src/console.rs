use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

/// Line-oriented stdin/stdout used by prompts and the interactive shell.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
    out: Stdout,
}

impl Console {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
            out: io::stdout(),
        }
    }

    pub async fn print(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        if !text.ends_with('\n') {
            self.out.write_all(b"\n").await?;
        }
        self.out.flush().await?;
        Ok(())
    }

    /// Returns `None` once stdin is closed.
    pub async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.out.write_all(label.as_bytes()).await?;
        self.out.flush().await?;
        Ok(self.lines.next_line().await?)
    }

    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} [y/N] ")).await?;
        Ok(answer.as_deref().is_some_and(is_yes))
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
