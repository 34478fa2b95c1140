pub mod cycle;
pub mod exercise;

pub use cycle::{NewTrainingCycle, TrainingCycle};
pub use exercise::{Exercise, LoggedSet, NewExercise, NewLoggedSet};
