//! services/api/src/web/pages.rs
//!
//! Server-rendered HTML for the home, login, and registration pages.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::web::state::AppState;

/// Escapes text for safe inclusion in HTML element content and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
        body = body
    ))
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="error" role="alert">{}</p>"#, escape_html(e)))
        .unwrap_or_default()
}

fn credentials_form(action: &str, button: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
  <label>Username <input name="username" autocomplete="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">{button}</button>
</form>"#
    )
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        "<h1>Sign in</h1>\n{}\n{}\n<p>No account? <a href=\"/register\">Register</a></p>",
        error_banner(error),
        credentials_form("/login", "Sign in")
    );
    layout("Sign in", &body)
}

pub fn register_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        "<h1>Create an account</h1>\n{}\n{}\n<p>Already registered? <a href=\"/login\">Sign in</a></p>",
        error_banner(error),
        credentials_form("/register", "Register")
    );
    layout("Register", &body)
}

// The answer key and notes stay hidden until the quiz is submitted.
const QUIZ_STYLE: &str = r#"<style>
.validation-box { display: none; }
.show-results .validation-box { display: block; }
.option { cursor: pointer; }
.option.selected { font-weight: bold; }
.option.correct { color: #15803d; }
.option.incorrect { color: #b91c1c; text-decoration: line-through; }
.badge { margin-left: .5em; padding: 0 .4em; border: 1px solid; border-radius: 4px; font-size: .8em; }
</style>"#;

const QUIZ_SCRIPT: &str = r#"<script>
const out = document.getElementById('quiz');
const conceptList = document.getElementById('concepts');
const statusLine = document.getElementById('status');
const submitBtn = document.getElementById('submit');
let questions = [];
let answers = {};

function el(tag, cls, text) {
  const e = document.createElement(tag);
  if (cls) e.className = cls;
  if (text !== undefined) e.textContent = text;
  return e;
}

function renderQuiz(data) {
  conceptList.innerHTML = '';
  out.innerHTML = '';
  out.classList.remove('show-results');
  answers = {};
  (Array.isArray(data.concepts) ? data.concepts : [])
    .forEach((c) => conceptList.appendChild(el('li', '', String(c))));
  questions = Array.isArray(data.questions) ? data.questions : [];
  questions.forEach((q, n) => {
    const card = el('li', 'quiz-card');
    const header = el('div', 'quiz-header');
    header.appendChild(el('span', 'question-text', String(q.text ?? '')));
    const difficulty = String(q.difficulty || 'Medium');
    header.appendChild(el('span', 'badge badge-' + difficulty.toLowerCase(), difficulty));
    card.appendChild(header);

    const opts = el('ol', 'options-list');
    opts.type = 'A';
    (Array.isArray(q.options) ? q.options : []).forEach((o, i) => {
      const opt = el('li', 'option', String(o));
      opt.addEventListener('click', () => {
        if (out.classList.contains('show-results')) return;
        answers[n] = i;
        opts.querySelectorAll('.option').forEach((x, j) => x.classList.toggle('selected', j === i));
      });
      opts.appendChild(opt);
    });
    card.appendChild(opts);

    const key = el('div', 'validation-box');
    if (q.validationNote) key.appendChild(el('p', '', String(q.validationNote)));
    key.appendChild(el('p', 'answer-key', 'Correct answer: ' + String.fromCharCode(65 + Number(q.answerIdx))));
    card.appendChild(key);
    out.appendChild(card);
  });
  submitBtn.hidden = questions.length === 0;
}

submitBtn.addEventListener('click', () => {
  const answered = Object.keys(answers).length;
  if (answered < questions.length &&
      !confirm(`You've only answered ${answered} out of ${questions.length} questions. Submit anyway?`)) {
    return;
  }
  out.classList.add('show-results');
  let score = 0;
  out.querySelectorAll('.quiz-card').forEach((card, n) => {
    const correct = questions[n].answerIdx;
    card.querySelectorAll('.option').forEach((opt, i) => {
      opt.classList.remove('selected');
      if (i === correct) opt.classList.add('correct');
      if (answers[n] === i && i !== correct) opt.classList.add('incorrect');
    });
    if (answers[n] === correct) score++;
  });
  submitBtn.hidden = true;
  statusLine.textContent = `Score: ${score} / ${questions.length}`;
});

document.getElementById('generate').addEventListener('click', async () => {
  renderQuiz({});
  statusLine.textContent = 'Generating...';
  const res = await fetch('/api/generate', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ text: document.getElementById('source').value })
  });
  if (res.status === 401) { window.location.href = '/login'; return; }
  const data = await res.json();
  if (data.error) { statusLine.textContent = 'Error: ' + data.error; return; }
  if (data.mock) { statusLine.textContent = data.message; return; }
  renderQuiz(data);
  statusLine.textContent = questions.length ? '' : 'Provide at least 50 characters of text.';
});
</script>"#;

pub fn home_page(username: &str) -> Html<String> {
    let body = format!(
        r#"{}
<header><p>Signed in as <strong>{}</strong> · <a href="/logout">Log out</a></p></header>
<h1>Quiz generator</h1>
<textarea id="source" rows="12" cols="80" placeholder="Paste educational text here"></textarea>
<p><button id="generate" type="button">Generate quiz</button></p>
<p id="status" role="status"></p>
<h2>Key concepts</h2>
<ul id="concepts"></ul>
<ol id="quiz"></ol>
<p><button id="submit" type="button" hidden>Submit my answers</button></p>
{}"#,
        QUIZ_STYLE,
        escape_html(username),
        QUIZ_SCRIPT
    );
    layout("Quiz generator", &body)
}

/// GET / - The quiz page, or a redirect to the login page without a session.
pub async fn home_handler(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match state.session_key.current_user(&headers) {
        Some(user) => home_page(&user.username).into_response(),
        None => Redirect::to("/login").into_response(),
    }
}
