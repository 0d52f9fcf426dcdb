//! Prompt strings for each feature.
//!
//! Every prompt restates the user's input verbatim, spells out the exact
//! JSON shape expected back and asks for that JSON alone.

use crate::constants::prompts::{
    QUIZ_OPTION_COUNT, QUIZ_OUTPUT_FORMAT, QUIZ_QUESTION_COUNT, SCHEDULE_OUTPUT_FORMAT,
};

#[derive(Debug, Clone, Copy)]
pub struct QuizPromptInput<'a> {
    pub topic: &'a str,
    pub reference_material: Option<&'a str>,
}

#[derive(Debug, Clone, Copy)]
pub struct SchedulePromptInput<'a> {
    pub course_name: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub weekly_hours: &'a str,
    pub session_length: &'a str,
    pub course_content: &'a str,
}

pub fn quiz_prompt(input: QuizPromptInput<'_>) -> String {
    let context = input
        .reference_material
        .map(|material| format!("\nReference Material:\n{}", material))
        .unwrap_or_default();

    format!(
        "Create a quiz about {topic}.{context}\n\
         The quiz should have exactly {questions} questions.\n\
         Each question should have {options} multiple choice options.\n\
         Format your response as a valid JSON object with this exact structure:\n\n\
         {format}\n\n\
         Ensure your response is ONLY the JSON object, with no additional text or formatting.",
        topic = input.topic,
        context = context,
        questions = QUIZ_QUESTION_COUNT,
        options = QUIZ_OPTION_COUNT,
        format = QUIZ_OUTPUT_FORMAT,
    )
}

pub fn schedule_prompt(input: SchedulePromptInput<'_>) -> String {
    format!(
        "Create a detailed study schedule for the following course:\n\n\
         Course Name: {name}\n\
         Start Date: {start}\n\
         End Date: {end}\n\
         Weekly Study Hours: {hours}\n\
         Session Length: {length}\n\n\
         Course Content:\n{content}\n\n\
         Return ONLY the JSON data without any markdown formatting or additional text, in this exact format:\n\
         {format}\n\n\
         Ensure the schedule is practical, easy to follow, and topics build upon each other logically.",
        name = input.course_name,
        start = input.start_date,
        end = input.end_date,
        hours = input.weekly_hours,
        length = input.session_length,
        content = input.course_content,
        format = SCHEDULE_OUTPUT_FORMAT,
    )
}

pub fn summary_prompt(content: &str) -> String {
    format!(
        "Please provide a concise summary of the following text:\n\n{}\n\nSummary:",
        content
    )
}
