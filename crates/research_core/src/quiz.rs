pub const QUIZ_OPTION_COUNT: usize = 4;

/// A multiple-choice question.
///
/// Fields are public for display; [`Quiz::new`] and [`Quiz::check_shape`]
/// enforce four options with the answer among them, and the session only
/// stores quizzes that pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizShapeError {
    #[error("expected 4 options, got {0}")]
    OptionCount(usize),
    #[error("answer is not one of the options")]
    AnswerNotAnOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Incorrect,
}

impl Quiz {
    pub fn new(
        question: String,
        options: Vec<String>,
        answer: String,
        explanation: String,
    ) -> Result<Self, QuizShapeError> {
        let quiz = Self {
            question,
            options,
            answer,
            explanation,
        };
        quiz.check_shape()?;
        Ok(quiz)
    }

    pub fn check_shape(&self) -> Result<(), QuizShapeError> {
        if self.options.len() != QUIZ_OPTION_COUNT {
            return Err(QuizShapeError::OptionCount(self.options.len()));
        }
        if !self.options.contains(&self.answer) {
            return Err(QuizShapeError::AnswerNotAnOption);
        }
        Ok(())
    }

    /// Plain string equality between the chosen option and the answer.
    pub fn grade(&self, choice: &str) -> Grade {
        if choice == self.answer {
            Grade::Correct
        } else {
            Grade::Incorrect
        }
    }

    /// Resolve a 1-based option number to its text.
    pub fn option(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }
}
