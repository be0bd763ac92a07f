//! Tabular Q-learning
//!
//! The platformer state is discretized into `2 * x_bins` keys (horizontal
//! bucket plus jump flag); each key maps to four action values.
//!
//! ## Usage Example
//!
//! ```no_run
//! use coin_grabber::{
//!     pipeline::{Trainer, TrainingConfig},
//!     platformer::{LiveGame, WorldConfig},
//!     q_learning::{AgentConfig, GreedyPolicy, QLearningAgent},
//! };
//!
//! let mut agent = QLearningAgent::new(AgentConfig::default())?;
//! let mut trainer = Trainer::seeded(WorldConfig::default(), TrainingConfig::default(), 42)?;
//! trainer.train(&mut agent)?;
//!
//! let mut game = LiveGame::new(WorldConfig::default());
//! game.run(&GreedyPolicy::new(&agent), 1_000);
//! # Ok::<(), coin_grabber::Error>(())
//! ```

pub mod agent;
pub mod discretizer;
pub mod policy;
pub mod q_table;
pub mod schedule;

pub use agent::{AgentConfig, QLearningAgent};
pub use discretizer::StateDiscretizer;
pub use policy::GreedyPolicy;
pub use q_table::{ActionValues, ValueTable};
pub use schedule::EpsilonSchedule;
