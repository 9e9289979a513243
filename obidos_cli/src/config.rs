use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use obidos::ConsoleRenderer;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{CliPlayer, Player, RandomPlayer};

/// Settings shared by everything taking part in one game.
pub struct Config {
    /// Used for shuffling and for seeding players without a seed of their own.
    pub rng: StdRng,
    pub renderer: ConsoleRenderer,
    /// Width of the terminal in columns, used for laying out tiles side by side.
    pub terminal_width: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// A human at the terminal
    Cli,
    /// Picks moves at random
    Random,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub nick: String,
    pub kind: PlayerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl PlayerConfig {
    /// Reads a JSON array of player configs.
    pub fn load(path: &Path) -> anyhow::Result<Vec<Self>> {
        let file = File::open(path)
            .with_context(|| format!("Could not open player config '{}'", path.display()))?;
        let configs: Vec<Self> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid player config '{}'", path.display()))?;
        if configs.is_empty() {
            anyhow::bail!("No players in '{}'", path.display());
        }
        Ok(configs)
    }

    pub fn make_player(&self, config: &mut Config) -> Box<dyn Player> {
        match self.kind {
            PlayerKind::Cli => Box::new(CliPlayer::stdio(
                self.nick.clone(),
                config.renderer,
                config.terminal_width,
            )),
            PlayerKind::Random => {
                let seed = self.seed.unwrap_or_else(|| config.rng.gen());
                Box::new(RandomPlayer::new(self.nick.clone(), seed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_player_lists() {
        let configs: Vec<PlayerConfig> = serde_json::from_str(
            r#"[
                { "nick": "Alice", "kind": "cli" },
                { "nick": "Bot", "kind": "random", "seed": 17 }
            ]"#,
        )
        .unwrap();
        assert_eq!(
            configs,
            [
                PlayerConfig {
                    nick: String::from("Alice"),
                    kind: PlayerKind::Cli,
                    seed: None,
                },
                PlayerConfig {
                    nick: String::from("Bot"),
                    kind: PlayerKind::Random,
                    seed: Some(17),
                },
            ]
        );
    }

    #[test]
    fn rejects_unknown_kinds() {
        let parsed = serde_json::from_str::<Vec<PlayerConfig>>(r#"[{ "nick": "X", "kind": "alien" }]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn loads_from_a_file() {
        let path = std::env::temp_dir().join(format!("obidos_players_{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        write!(file, r#"[{{ "nick": "Bot", "kind": "random" }}]"#).unwrap();
        drop(file);

        let configs = PlayerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].kind, PlayerKind::Random);

        assert!(PlayerConfig::load(&path).is_err());
    }

    #[test]
    fn random_players_take_their_name() {
        use rand::SeedableRng;

        let mut config = Config {
            rng: StdRng::seed_from_u64(0),
            renderer: ConsoleRenderer::default(),
            terminal_width: 80,
        };
        let player = PlayerConfig {
            nick: String::from("Bot"),
            kind: PlayerKind::Random,
            seed: None,
        }
        .make_player(&mut config);
        assert_eq!(player.name(), "Bot");
    }
}
