pub const QUIZ_SYSTEM_PROMPT: &str =
    "You are a quiz generator that responds only with valid JSON objects.";

pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates concise summaries.";

pub const SCHEDULE_SYSTEM_PROMPT: &str = "You are a helpful educational planner. Return ONLY valid JSON data without any markdown formatting or explanation.";

pub const QUIZ_QUESTION_COUNT: usize = 5;
pub const QUIZ_OPTION_COUNT: usize = 4;

pub const QUIZ_OUTPUT_FORMAT: &str = r#"{
  "quiz": [
    {
      "question": "Question text here",
      "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
      "correct_answer": "The exact text of the correct option",
      "explanation": "Explanation for why this answer is correct"
    }
  ]
}"#;

pub const SCHEDULE_OUTPUT_FORMAT: &str = r#"{
  "overview": {
    "totalSessions": number,
    "totalHours": number,
    "courseSummary": "string"
  },
  "sessions": [
    {
      "date": "YYYY-MM-DD",
      "duration": number,
      "sessionNumber": number,
      "learningObjectives": ["string"],
      "topics": ["string"],
      "materials": ["string"],
      "preparation": "string",
      "notes": "string"
    }
  ]
}"#;
