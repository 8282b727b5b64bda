// src/seed.rs

use crate::{
    models::quiz::{NewQuiz, Question},
    store::{QuizCatalog, StoreResult},
};

/// Inserts the sample quizzes when the catalog is empty.
/// Returns the number of quizzes inserted.
pub async fn seed_quizzes(catalog: &dyn QuizCatalog) -> StoreResult<usize> {
    if catalog.count_quizzes().await? > 0 {
        return Ok(0);
    }

    let quizzes = sample_quizzes();
    let count = quizzes.len();
    for quiz in quizzes {
        catalog.insert_quiz(quiz).await?;
    }

    tracing::info!("Seeded {} sample quizzes", count);
    Ok(count)
}

fn question(text: &str, options: [&str; 4], correct_answer: i64, points: i64) -> Question {
    Question {
        question: text.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
        points: Some(points),
    }
}

pub fn sample_quizzes() -> Vec<NewQuiz> {
    vec![
        NewQuiz {
            title: "JavaScript Fundamentals".to_string(),
            description: Some("Test your knowledge of JavaScript basics".to_string()),
            difficulty: "beginner".to_string(),
            points: 100,
            time_limit: 300,
            subject: Some("javascript".to_string()),
            questions: vec![
                question(
                    "What is the correct way to declare a variable in JavaScript?",
                    ["var myVar;", "variable myVar;", "v myVar;", "declare myVar;"],
                    0,
                    25,
                ),
                question(
                    "Which method is used to add an element to the end of an array?",
                    ["append()", "push()", "add()", "insert()"],
                    1,
                    25,
                ),
                question(
                    "What does '===' operator do in JavaScript?",
                    ["Assignment", "Comparison without type checking", "Strict equality comparison", "Not equal"],
                    2,
                    25,
                ),
                question(
                    "How do you create a function in JavaScript?",
                    ["function myFunction() {}", "create myFunction() {}", "def myFunction() {}", "func myFunction() {}"],
                    0,
                    25,
                ),
            ],
        },
        NewQuiz {
            title: "React Basics".to_string(),
            description: Some("Learn the fundamentals of React".to_string()),
            difficulty: "intermediate".to_string(),
            points: 150,
            time_limit: 450,
            subject: Some("react".to_string()),
            questions: vec![
                question(
                    "What is JSX?",
                    ["JavaScript XML", "Java Syntax Extension", "JSON Extension", "JavaScript Extension"],
                    0,
                    30,
                ),
                question(
                    "How do you create a React component?",
                    ["React.createComponent()", "function Component() {}", "new React.Component()", "React.component()"],
                    1,
                    30,
                ),
                question(
                    "What is the purpose of useState hook?",
                    ["To fetch data", "To manage component state", "To handle events", "To create components"],
                    1,
                    30,
                ),
                question(
                    "How do you pass data to a child component?",
                    ["Through state", "Through props", "Through context", "Through refs"],
                    1,
                    30,
                ),
                question(
                    "What is the virtual DOM?",
                    ["A copy of the real DOM", "A JavaScript representation of the DOM", "A database", "A server"],
                    1,
                    30,
                ),
            ],
        },
        NewQuiz {
            title: "Node.js Essentials".to_string(),
            description: Some("Master Node.js backend development".to_string()),
            difficulty: "advanced".to_string(),
            points: 200,
            time_limit: 600,
            subject: Some("nodejs".to_string()),
            questions: vec![
                question(
                    "What is Node.js?",
                    ["A JavaScript framework", "A JavaScript runtime", "A database", "A web browser"],
                    1,
                    40,
                ),
                question(
                    "Which module is used to create a web server in Node.js?",
                    ["fs", "http", "path", "url"],
                    1,
                    40,
                ),
                question(
                    "What is npm?",
                    ["Node Package Manager", "New Programming Method", "Node Programming Module", "Network Protocol Manager"],
                    0,
                    40,
                ),
                question(
                    "How do you handle asynchronous operations in Node.js?",
                    ["Callbacks only", "Promises only", "Async/Await only", "Callbacks, Promises, and Async/Await"],
                    3,
                    40,
                ),
                question(
                    "What is Express.js?",
                    ["A database", "A web framework for Node.js", "A testing library", "A package manager"],
                    1,
                    40,
                ),
            ],
        },
    ]
}
