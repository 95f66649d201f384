//! Prompt builders, one per generation task.
//!
//! Each builder is a pure function composing the task instruction, the
//! expected JSON shape, and the caller-supplied context into a single prompt
//! string. No network, no state. The JSON contracts stated here mirror the
//! schemas the services validate against after repair.

use serde::Serialize;

use crate::types::{QuestionItem, Task, TaskRef};

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Clarifying questions from the raw idea, duration and team size.
pub fn question(idea: &str, duration: &str, num_people: u32) -> String {
    format!(
        r#"You are a hackathon support agent helping programming beginners turn a product idea into a specification.
Idea, duration and team size:
Idea: {idea}
Duration: {duration}
Team size: {num_people}
Ask the questions needed to pin the idea down into a concrete specification.
If the idea is already specific, ask 3 to 5 questions; if it is abstract, ask more.
Do not ask about frameworks. Asking about the user's coding background (for example which languages they can write) is fine.
Include an example answer in the "answer" field of each item; keep the "question" field free of answers.
Respond with JSON only, in exactly this shape:
{{"questions": [{{"question": "string", "answer": "string"}}]}}"#
    )
}

/// Markdown specification from the answered questions.
pub fn summary(answers: &[QuestionItem]) -> String {
    let qa_block: String = answers
        .iter()
        .map(|item| format!("Q: {}\nA: {}", item.question, item.answer))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"You are a hackathon support agent helping programming beginners build a product.
You asked the user the questions below to nail down the product specification and received these answers.
Write the complete product specification based on them.
The framework will be chosen from this specification later, so do not mention frameworks.
Return only the specification in markdown. Do not wrap it in a ```markdown fence and do not add anything else.
{qa_block}"#
    )
}

/// Ranked framework recommendations over the fixed candidate sets.
pub fn framework(specification: &str) -> String {
    format!(
        r#"You are a product development expert. Based on the specification below, rank the fixed frontend candidates (React, Vue, Next, Astro) and backend candidates (Nest, Flask, FastAPI, Rails, Gin).
Assign each candidate a priority (smaller numbers rank higher) based on its fit for this project, and give the reason.
Respond with JSON only, in exactly this shape:
{{"frontend": [{{"name": "string", "priority": 1, "reason": "string"}}], "backend": [{{"name": "string", "priority": 1, "reason": "string"}}]}}
Specification:
{specification}"#
    )
}

/// Directory layout as a fenced code block, branching on project category.
pub fn directory(specification: &str, framework: &str) -> String {
    format!(
        r#"You are an expert in project directory layout. Design the best directory structure for the specification and framework below.
Specification:
{specification}
Framework:
{framework}
Answer with the directory structure only, as a fenced code block. Any other content is incorrect.

For web frameworks, the root must contain /devcontainer, /frontend and /backend.
Example:
```
project/
├── src/
│   ├── components/
│   ├── pages/
│   ├── styles/
│   └── utils/
├── public/
├── README.md
├── package.json
└── .gitignore
```

For Android, the root must contain /app, /gradle and build.gradle.
Example:
```
YourApp/
├── app/
│   ├── build.gradle.kts
│   └── src/
│       ├── androidTest/
│       ├── test/
│       └── main/
│           ├── AndroidManifest.xml
│           ├── java/com/example/yourapp/
│           └── res/
├── build.gradle.kts
├── settings.gradle.kts
├── gradlew
└── README.md
```

For iOS, the root must contain /ios.
Example:
```
project/
├── ios/
│   ├── AppDelegate.swift
│   ├── Info.plist
│   ├── ViewController.swift
│   └── Main.storyboard
├── Podfile
└── project.xcworkspace/
```"#
    )
}

/// Flat task list covering the whole build, excluding environment setup.
pub fn tasks(specification: &str, directory: &str, framework: &str) -> String {
    format!(
        r#"You are a professional app builder. Based on the information below, list every task needed to build this app, concretely.
Do not include environment setup tasks.
Specification:
{specification}
Directory structure:
{directory}
Framework:
{framework}
Every task must include all of: task_name (string), priority (one of "Must", "Should", "Could"), content (string).
Respond with JSON only, in exactly this shape:
{{"tasks": [{{"task_name": "string", "priority": "Must", "content": "string"}}]}}"#
    )
}

/// Hands-on detail for one batch of tasks, with the specification as context.
pub fn task_detail(specification: &str, batch: &[Task]) -> String {
    format!(
        r#"You are an expert at breaking tasks down into concrete steps. For each task in the list below, generate hands-on instructions as a "detail" field.
The hands-on detail must include concrete steps, commands and code where relevant, in markdown, detailed enough that reading it alone is sufficient to complete the task.
Keep code samples minimal; leave some room for the reader to work things out.
The user is a beginner taking part in a hackathon.
Project specification for context:
{specification}
Input task list:
{tasks}
Return every input task, in the same order, keeping task_name, priority and content unchanged and adding the detail field.
Respond with JSON only, in exactly this shape:
{{"tasks": [{{"task_name": "string", "priority": "Must", "content": "string", "detail": "string"}}]}}"#,
        tasks = to_json(&batch)
    )
}

/// Dependency edges between tasks, forest-shaped, parent index < child index.
pub fn graph(tasks: &[TaskRef]) -> String {
    format!(
        r#"You are a professional project manager. From the task list below, infer the dependencies between tasks.
Think of the development flow as a tree, like API design -> build API 1 -> build API 2. Only task_id, task_name and content are provided.
Dependencies are one-way and must contain no cycles. Each task should appear in at most one tree.
Tasks like reading documentation depend on nothing.
Always output edges from the smaller task_id to the larger task_id.
Task list:
{tasks}
Respond with JSON only, in exactly this shape:
{{"edges": [{{"parent": 0, "child": 1}}]}}"#,
        tasks = to_json(&tasks)
    )
}

/// Start/end day offsets for each task within the project duration.
pub fn duration(total_days: u32, tasks: &[TaskRef]) -> String {
    format!(
        r#"You are an expert at estimating task durations. Below are the total project duration ({total_days} days) and the tasks.
Only task_id, task_name and content are provided. From each task's content, estimate its working period as a start day and end day.
Both days must fall within 1 and {total_days}, and start must not exceed end. Tasks may overlap; parallel work is allowed.
Task list:
{tasks}
Respond with strictly JSON only, in exactly this shape:
{{"durations": [{{"task_id": 0, "start": 1, "end": 5}}]}}"#,
        tasks = to_json(&tasks)
    )
}

/// Environment setup hands-on, four markdown sections, branching by category.
pub fn environment(specification: &str, directory: &str, framework: &str) -> String {
    format!(
        r#"Generate environment setup hands-on instructions from the information below. Answer in markdown, but make sure the markdown strings do not break the JSON shape.
Specification:
{specification}
Directory structure:
{directory}
Framework:
{framework}
For web frameworks, produce detailed hands-on text for each of:
1. overall: an overview of setting up the whole project environment
2. devcontainer: how to use .devcontainer and its exact contents, including the Dockerfile and devcontainer.json code
3. frontend: initial frontend setup steps (do not repeat locally what the devcontainer already provides)
4. backend: initial backend setup steps (do not repeat locally what the devcontainer already provides)
For Android, cover Android Studio and SDK installation in overall, state in devcontainer that .devcontainer is not used, and fill frontend and backend accordingly.
For iOS, cover Xcode and SDK installation in overall, state in devcontainer that .devcontainer is not used, and fill frontend and backend accordingly.
Respond with JSON only, in exactly this shape:
{{"overall": "string", "devcontainer": "string", "frontend": "string", "backend": "string"}}"#
    )
}

/// Single deploy-service recommendation.
pub fn deploy(specification: &str, framework: &str) -> String {
    format!(
        r#"You are an AI agent supporting a hackathon team. Recommend the best deploy service based on the information below.
Framework information: {framework}
Specification: {specification}
Output the chosen deploy service as a reasonable amount of markdown in the "deploy" field.
You must respond with JSON only; anything else will break the system.
Respond in exactly this shape:
{{"deploy": "string"}}"#
    )
}

/// Project-scoped chat reply grounded in the current task.
pub fn chat(
    specification: &str,
    directory_structure: &str,
    chat_history: &str,
    user_question: &str,
    framework: &str,
    task_detail: &str,
) -> String {
    format!(
        r#"You are a professional chatbot assisting an engineer. Using the information below, give the best possible answer to the user's question.
The user is working on the current task detail; the specification and directory structure describe the project as a whole.
Answer in markdown.
Current task detail:
{task_detail}
Specification:
{specification}
Directory structure:
{directory_structure}
Chat history:
{chat_history}
New question from the user:
{user_question}
Framework in use:
{framework}
Answer with the text of your reply only, nothing else."#
    )
}

/// Free-text hands-on for a single task outside the batch pipeline.
pub fn handson(specification: &str, task_title: &str, priority: &str, task_spec: &str) -> String {
    format!(
        r#"You are a product development expert. Generate a hands-on guide for implementing the feature described below, based on the project specification, the task title and its priority.
Specification:
{specification}
Title:
{task_title}
Priority:
{priority}
Task description:
{task_spec}
Output the hands-on guide based on the above."#
    )
}
