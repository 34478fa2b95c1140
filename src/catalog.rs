//! Built-in exercise library and the starter program

use serde::Serialize;

use crate::models::NewExercise;
use crate::muscle::Category;

pub const DEFAULT_SCHEME: &str = "4x8-12";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExerciseTemplate {
  pub name: &'static str,
  pub target: &'static str,
  pub category: Category,
  pub default_scheme: &'static str,
}

const fn template(name: &'static str, target: &'static str, category: Category) -> ExerciseTemplate {
  ExerciseTemplate {
    name,
    target,
    category,
    default_scheme: DEFAULT_SCHEME,
  }
}

pub const PREDEFINED_EXERCISES: &[ExerciseTemplate] = &[
  // Chest
  template("Bench Press", "Chest", Category::Chest),
  template("Incline Bench Press", "Upper chest", Category::Chest),
  template("Decline Bench Press", "Lower chest", Category::Chest),
  template("Dumbbell Fly", "Pectorals", Category::Chest),
  template("Incline Dumbbell Fly", "Upper chest", Category::Chest),
  template("Pec Deck", "Pectorals", Category::Chest),
  template("Cable Crossover", "Lower / mid chest", Category::Chest),
  template("Push-Up", "Chest / Triceps", Category::Chest),
  // Back
  template("Barbell Row", "Mid back", Category::Back),
  template("Lat Pulldown", "Lats", Category::Back),
  template("Seated Cable Row", "Upper back", Category::Back),
  template("Deadlift", "Lower back / Hamstrings", Category::Back),
  template("Pull-Up", "Lats", Category::Back),
  template("T-Bar Row", "Mid back", Category::Back),
  template("Straight-Arm Pulldown", "Latissimus", Category::Back),
  template("One-Arm Dumbbell Row", "Lats / Rhomboids", Category::Back),
  // Legs
  template("Squat", "Quadriceps", Category::Legs),
  template("Sumo Squat", "Adductors / Glutes", Category::Legs),
  template("Leg Press", "Quadriceps / Glutes", Category::Legs),
  template("Leg Extension", "Quadriceps", Category::Legs),
  template("Lying Leg Curl", "Hamstrings", Category::Legs),
  template("Hip Thrust", "Glutes", Category::Legs),
  template("Lunge", "Quadriceps / Glutes", Category::Legs),
  template("Romanian Deadlift", "Hamstrings / Glutes", Category::Legs),
  template("Hip Adduction", "Adductors", Category::Legs),
  template("Hip Abduction", "Gluteus medius", Category::Legs),
  template("Standing Calf Raise", "Calves", Category::Legs),
  template("Seated Calf Raise", "Calves (soleus)", Category::Legs),
  // Shoulders
  template("Overhead Press", "Shoulders", Category::Shoulders),
  template("Arnold Press", "Delts", Category::Shoulders),
  template("Lateral Raise", "Side delts", Category::Shoulders),
  template("Front Raise", "Front delts", Category::Shoulders),
  template("Reverse Fly", "Rear delts", Category::Shoulders),
  template("Shrug", "Trapezius", Category::Shoulders),
  template("Upright Row", "Traps / Delts", Category::Shoulders),
  // Arms
  template("Barbell Curl", "Biceps", Category::Arms),
  template("Hammer Curl", "Brachioradialis", Category::Arms),
  template("Alternating Dumbbell Curl", "Biceps", Category::Arms),
  template("Concentration Curl", "Biceps", Category::Arms),
  template("Preacher Curl", "Biceps", Category::Arms),
  template("Triceps Pushdown", "Triceps", Category::Arms),
  template("Rope Pushdown", "Triceps", Category::Arms),
  template("Skull Crusher", "Triceps", Category::Arms),
  template("Overhead Triceps Extension", "Triceps", Category::Arms),
  template("Parallel Bar Dip", "Triceps", Category::Arms),
  // Core
  template("Crunch", "Upper abs", Category::Core),
  template("Hanging Leg Raise", "Lower abdominals", Category::Core),
  template("Plank", "Core", Category::Core),
  template("Oblique Crunch", "Obliques", Category::Core),
];

/// Library entries for one group, in catalog order
pub fn templates_for(category: Category) -> Vec<&'static ExerciseTemplate> {
  PREDEFINED_EXERCISES
    .iter()
    .filter(|t| t.category == category)
    .collect()
}

pub fn find_template(name: &str) -> Option<&'static ExerciseTemplate> {
  PREDEFINED_EXERCISES
    .iter()
    .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}

impl ExerciseTemplate {
  /// A new exercise from this template, scheduled on `day_of_week`
  pub fn to_new_exercise(&self, day_of_week: &str) -> NewExercise {
    NewExercise {
      name: self.name.to_string(),
      target: self.target.to_string(),
      category: self.category.to_string(),
      scheme: self.default_scheme.to_string(),
      day_of_week: day_of_week.to_string(),
      image_uri: None,
      cycle_id: None,
    }
  }
}

/// Five-day compound split, one lift per weekday
pub fn starter_program() -> Vec<NewExercise> {
  let entry = |name: &str, target: &str, category: Category, scheme: &str, day: &str| NewExercise {
    name: name.to_string(),
    target: target.to_string(),
    category: category.to_string(),
    scheme: scheme.to_string(),
    day_of_week: day.to_string(),
    image_uri: None,
    cycle_id: None,
  };

  vec![
    entry("Bench Press", "Chest", Category::Chest, "4x8-12", "Monday"),
    entry("Squat", "Legs", Category::Legs, "4x6-10", "Tuesday"),
    entry("Deadlift", "Back", Category::Back, "3x5", "Wednesday"),
    entry("Overhead Press", "Shoulders", Category::Shoulders, "4x8-12", "Thursday"),
    entry("Barbell Row", "Back", Category::Back, "4x8-12", "Friday"),
  ]
}
