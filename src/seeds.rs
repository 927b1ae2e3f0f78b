//! Built-in fallback quiz content.
//!
//! Served when no OPENAI_API_KEY is configured so the app stays usable
//! without credentials. Questions are cycled to the requested count and
//! their options shuffled per serving.

use rand::seq::SliceRandom;

use crate::domain::Quiz;

/// (question, [four options]); the correct option is always
/// listed first here and shuffled at serving time.
const SEED_BANK: &[(&str, [&str; 4])] = &[
  ("Which planet is closest to the sun?", ["Mercury", "Venus", "Mars", "Jupiter"]),
  ("What is the largest ocean on Earth?", ["Pacific", "Atlantic", "Indian", "Arctic"]),
  ("Which gas do plants absorb from the atmosphere?", ["Carbon dioxide", "Oxygen", "Nitrogen", "Helium"]),
  ("Who painted the Mona Lisa?", ["Leonardo da Vinci", "Michelangelo", "Raphael", "Donatello"]),
  ("What is the chemical symbol for gold?", ["Au", "Ag", "Gd", "Go"]),
  ("Which country has the largest population?", ["India", "China", "USA", "Indonesia"]),
  ("How many sides does a hexagon have?", ["Six", "Five", "Seven", "Eight"]),
  ("What is the capital of Australia?", ["Canberra", "Sydney", "Melbourne", "Perth"]),
  ("Which instrument has 88 keys?", ["Piano", "Organ", "Accordion", "Harpsichord"]),
  ("What is the fastest land animal?", ["Cheetah", "Lion", "Pronghorn", "Greyhound"]),
  ("In which year did humans first land on the moon?", ["1969", "1965", "1972", "1959"]),
  ("What is the smallest prime number?", ["2", "1", "3", "0"]),
  ("Which element has the atomic number 1?", ["Hydrogen", "Helium", "Oxygen", "Carbon"]),
  ("Who wrote 'Romeo and Juliet'?", ["William Shakespeare", "Charles Dickens", "Jane Austen", "Oscar Wilde"]),
  ("What is the longest river in the world?", ["Nile", "Amazon", "Yangtze", "Mississippi"]),
];

/// Build a fallback quiz of `n` questions, cycling through the bank when
/// more are requested than it holds. Always satisfies the quiz shape
/// invariant (checked by a test below, not at runtime).
pub fn seed_quiz(n: usize) -> Quiz {
  let mut rng = rand::thread_rng();
  let mut questions = Vec::with_capacity(n);
  let mut choices = Vec::with_capacity(n);
  let mut answers = Vec::with_capacity(n);

  for i in 0..n {
    let (q, opts) = SEED_BANK[i % SEED_BANK.len()];
    let correct = opts[0].to_string();
    let mut shuffled: Vec<String> = opts.iter().map(|s| s.to_string()).collect();
    shuffled.shuffle(&mut rng);
    questions.push(q.to_string());
    choices.push(shuffled);
    answers.push(correct);
  }

  Quiz { questions, choices, answers }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn seed_quiz_satisfies_shape_invariant() {
    for n in [1, 2, 5, 15, SEED_BANK.len() + 3] {
      let quiz = seed_quiz(n);
      assert_eq!(quiz.len(), n);
      quiz.validate().expect("seed quiz must be well-shaped");
    }
  }
}
