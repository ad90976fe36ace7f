//! HTML rendering of lesson plans and the generator page.
//!
//! Rendering is a pure function of its inputs. Printing is left to the
//! browser: the plan carries a Print button calling `window.print()`, and the
//! print stylesheet hides everything marked `no-print`.

use std::fmt::Write as _;

use crate::controller::ControllerSnapshot;
use crate::prompt::PERIOD_MINUTES;
use crate::schema::{ClassLevel, Difficulty, LessonPlan, PeriodPlan};

const APP_NAME: &str = "Shikshak Saarathi";

const PLAN_FOOTER: &str = "Generated by Shikshak Saarathi • Aligned with NEP 2020 &amp; NCTE Standards • Middle School Lesson Plan";

/// Screen and print styles for the page.
pub const STYLESHEET: &str = r#"
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; background: #f8fafc; color: #1e293b; }
header.site { background: #fff; border-bottom: 1px solid #e2e8f0; padding: 12px 24px; }
header.site h1 { margin: 0; font-size: 1.25rem; }
header.site .tagline { margin: 2px 0 0; font-size: 10px; letter-spacing: .15em; text-transform: uppercase; color: #4f46e5; font-weight: 700; }
main { max-width: 1024px; margin: 40px auto; padding: 0 16px; display: grid; grid-template-columns: 1fr 2fr; gap: 32px; }
.card { background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; padding: 24px; }
label.field { display: block; font-size: 12px; font-weight: 700; text-transform: uppercase; color: #64748b; margin: 16px 0 6px; }
.choices { display: grid; grid-template-columns: repeat(3, 1fr); gap: 8px; }
.choices label { border: 2px solid #f1f5f9; border-radius: 8px; padding: 8px; text-align: center; cursor: pointer; }
.choices input { display: none; }
.choices input:checked + span { color: #4338ca; font-weight: 600; }
input[type=text], select { width: 100%; padding: 10px 14px; border: 1px solid #e2e8f0; border-radius: 8px; background: #f8fafc; }
button.primary { width: 100%; margin-top: 20px; padding: 12px; border: 0; border-radius: 8px; background: #4f46e5; color: #fff; font-weight: 600; cursor: pointer; }
button.primary[disabled] { opacity: .6; cursor: wait; }
.error-banner { margin-top: 16px; padding: 12px; background: #fff1f2; border: 1px solid #ffe4e6; color: #e11d48; font-size: 12px; border-radius: 8px; }
.empty-state { text-align: center; padding: 120px 16px; color: #94a3b8; }
.skeleton { height: 120px; margin-bottom: 24px; background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; animation: pulse 1.5s infinite; }
@keyframes pulse { 50% { opacity: .5; } }
.plan { background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden; }
.plan-header { background: #f8fafc; padding: 24px 32px; border-bottom: 1px solid #e2e8f0; display: flex; justify-content: space-between; gap: 16px; }
.plan-header h2 { margin: 0; font-family: Georgia, serif; color: #312e81; }
.plan-meta span { margin-right: 24px; font-size: 14px; color: #475569; }
.print-button { padding: 8px 16px; background: #1e293b; color: #fff; border: 0; border-radius: 8px; cursor: pointer; }
.plan-body { padding: 24px 32px; }
.plan-body h3 { border-bottom: 1px solid #e2e8f0; padding-bottom: 8px; margin-top: 32px; text-transform: uppercase; letter-spacing: .05em; font-size: 1rem; }
.period { border-left: 2px solid #e0e7ff; padding-left: 24px; margin-bottom: 32px; }
.period h4 { color: #312e81; }
.period h4 .objective { font-weight: normal; font-style: italic; color: #475569; }
.activity { background: #eef2ff; padding: 16px; border-radius: 8px; }
.checks { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-top: 16px; }
.quick-check, .homework { border: 1px solid #e2e8f0; padding: 16px; border-radius: 8px; }
.tlm span { display: inline-block; margin: 0 8px 8px 0; padding: 4px 12px; background: #f1f5f9; border-radius: 999px; font-size: 12px; }
.reflection { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; }
.reflection blockquote { margin: 0; padding: 12px; border: 1px solid #f1f5f9; font-style: italic; font-size: 12px; }
.plan-footer { padding: 24px 32px; background: #f1f5f9; text-align: center; font-size: 10px; color: #94a3b8; }
footer.site { border-top: 1px solid #e2e8f0; padding: 40px 16px; text-align: center; color: #94a3b8; font-size: 14px; }
@media print {
  .no-print { display: none !important; }
  body { background: #fff; color: #000; }
  main { display: block; margin: 0; max-width: none; }
  .plan { border: 0; }
  .plan-header, .plan-footer, .activity, .tlm span { background: #fff; color: #000; }
  .plan-header { border-bottom: 2px solid #000; }
  .plan-header h2, .period h4, .period h4 .objective { color: #000; font-style: normal; }
  .period { border-left-color: #cbd5e1; break-inside: avoid; }
  .outcome-number { display: none; }
}
"#;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Plan document
// ---------------------------------------------------------------------------

/// Render a lesson plan as an HTML fragment.
///
/// Sections appear in a fixed order: learning outcomes, TLM, period-wise
/// plan, assessment plan, teacher reflection. The period count in the header
/// is the number of period entries.
pub fn render_plan(plan: &LessonPlan) -> String {
    let info = &plan.basic_info;
    let mut html = String::with_capacity(8192);

    html.push_str("<article class=\"plan\">\n");

    // Header.
    html.push_str("<div class=\"plan-header\">\n<div>\n");
    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&info.topic));
    html.push_str("<div class=\"plan-meta\">");
    let _ = write!(
        html,
        "<span>Class: {}</span><span>Subject: {}</span><span>Difficulty: {}</span>\
         <span>Periods: {} ({} min each)</span>",
        escape_html(&info.class),
        escape_html(&info.subject),
        escape_html(info.difficulty.as_str()),
        plan.periods.len(),
        PERIOD_MINUTES,
    );
    html.push_str("</div>\n</div>\n");
    html.push_str(
        "<button type=\"button\" class=\"print-button no-print\" onclick=\"window.print()\">\
         Print Plan</button>\n",
    );
    html.push_str("</div>\n");

    html.push_str("<div class=\"plan-body\">\n");

    // Learning outcomes.
    html.push_str("<section class=\"outcomes\">\n<h3>Learning Outcomes</h3>\n<ol>\n");
    for (idx, outcome) in plan.learning_outcomes.iter().enumerate() {
        let _ = writeln!(
            html,
            "<li><span class=\"outcome-number\">{}</span> {}</li>",
            idx + 1,
            escape_html(outcome)
        );
    }
    html.push_str("</ol>\n</section>\n");

    // Teaching-learning materials.
    html.push_str("<section class=\"tlm\">\n<h3>TLM (Teaching-Learning Materials)</h3>\n");
    for item in &plan.tlm {
        let _ = writeln!(html, "<span>• {}</span>", escape_html(item));
    }
    html.push_str("</section>\n");

    // Period-wise plan.
    html.push_str("<section class=\"periods\">\n<h3>Period-wise Plan</h3>\n");
    for period in &plan.periods {
        render_period(&mut html, period);
    }
    html.push_str("</section>\n");

    // Assessment.
    html.push_str("<section class=\"assessment\">\n<h3>Assessment Plan</h3>\n");
    html.push_str("<h5>Ongoing Assessment</h5>\n<ul>\n");
    for item in &plan.assessment_plan.ongoing {
        let _ = writeln!(html, "<li>{}</li>", escape_html(item));
    }
    html.push_str("</ul>\n<h5>Summative Task</h5>\n");
    let _ = writeln!(
        html,
        "<p class=\"summative\">{}</p>",
        escape_html(&plan.assessment_plan.summative)
    );
    html.push_str("</section>\n");

    // Reflection.
    html.push_str("<section class=\"reflection-section\">\n<h3>Teacher Reflection</h3>\n");
    html.push_str("<div class=\"reflection\">\n");
    for q in &plan.teacher_reflection {
        let _ = writeln!(html, "<blockquote>\"{}\"</blockquote>", escape_html(q));
    }
    html.push_str("</div>\n</section>\n");

    html.push_str("</div>\n");
    let _ = writeln!(html, "<div class=\"plan-footer\">{PLAN_FOOTER}</div>");
    html.push_str("</article>\n");

    html
}

fn render_period(html: &mut String, period: &PeriodPlan) {
    let _ = writeln!(html, "<div class=\"period\" data-period=\"{}\">", period.period);
    let _ = writeln!(
        html,
        "<h4>Period {}: <span class=\"objective\">{}</span></h4>",
        period.period,
        escape_html(&period.objective)
    );
    let _ = writeln!(
        html,
        "<div class=\"activity\"><h5>Main Activity</h5><p>{}</p></div>",
        escape_html(&period.activity)
    );
    html.push_str("<div class=\"checks\">\n");
    let _ = writeln!(
        html,
        "<div class=\"quick-check\"><h5>Quick Check</h5><p>\"{}\"</p></div>",
        escape_html(&period.quick_check)
    );
    let _ = writeln!(
        html,
        "<div class=\"homework\"><h5>Homework</h5><p>{}</p></div>",
        escape_html(&period.homework)
    );
    html.push_str("</div>\n</div>\n");
}

// ---------------------------------------------------------------------------
// Full page
// ---------------------------------------------------------------------------

/// Render a standalone printable document containing only the plan.
pub fn render_document(plan: &LessonPlan) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title} - {APP_NAME}</title><style>{STYLESHEET}</style></head>\n\
         <body>\n<main style=\"display:block\">\n{plan}</main>\n</body></html>\n",
        title = escape_html(&plan.basic_info.topic),
        plan = render_plan(plan),
    )
}

/// Render the generator page for a controller snapshot.
///
/// `year` is printed in the page footer.
pub fn render_page(snapshot: &ControllerSnapshot, year: i32) -> String {
    let mut html = String::with_capacity(16384);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">");
    let _ = write!(html, "<title>{APP_NAME}</title>");
    if snapshot.loading {
        // Poll until the in-flight generation settles.
        html.push_str("<meta http-equiv=\"refresh\" content=\"3\">");
    }
    let _ = write!(html, "<style>{STYLESHEET}</style></head>\n<body>\n");

    html.push_str("<header class=\"site no-print\">\n");
    let _ = writeln!(html, "<h1>{APP_NAME}</h1>");
    html.push_str("<p class=\"tagline\">NEP 2020 • NCTE Aligned</p>\n</header>\n");

    html.push_str("<main>\n");
    render_form(&mut html, snapshot);

    html.push_str("<section class=\"result\">\n");
    match (&snapshot.plan, snapshot.loading) {
        (_, true) => {
            html.push_str("<div class=\"no-print\" aria-busy=\"true\">\n");
            for _ in 0..3 {
                html.push_str("<div class=\"skeleton\"></div>\n");
            }
            html.push_str("</div>\n");
        }
        (Some(plan), false) => html.push_str(&render_plan(plan)),
        (None, false) => {
            html.push_str(
                "<div class=\"empty-state no-print\">\n\
                 <h3>Your lesson plan will appear here</h3>\n\
                 <p>Select your class, subject and topic to get a comprehensive \
                 6-period pedagogical plan instantly.</p>\n</div>\n",
            );
        }
    }
    html.push_str("</section>\n</main>\n");

    let _ = writeln!(
        html,
        "<footer class=\"site no-print\">© {year} {APP_NAME}. Supporting Indian Educators.</footer>"
    );
    html.push_str("</body></html>\n");

    html
}

fn render_form(html: &mut String, snapshot: &ControllerSnapshot) {
    let form = &snapshot.form;

    html.push_str("<aside class=\"card no-print\">\n<h2>Plan Generator</h2>\n");
    html.push_str("<form method=\"post\" action=\"/generate\">\n");

    html.push_str("<label class=\"field\">Class</label>\n<div class=\"choices\">\n");
    for level in ClassLevel::ALL {
        let checked = if level == form.class { " checked" } else { "" };
        let _ = writeln!(
            html,
            "<label><input type=\"radio\" name=\"class\" value=\"{v}\"{checked}><span>Grade {v}</span></label>",
            v = level.as_str(),
        );
    }
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        "<label class=\"field\" for=\"subject\">Subject</label>\
         <input type=\"text\" id=\"subject\" name=\"subject\" \
         placeholder=\"e.g. Science, Mathematics\" value=\"{}\">",
        escape_html(&form.subject)
    );
    let _ = writeln!(
        html,
        "<label class=\"field\" for=\"topic\">Topic</label>\
         <input type=\"text\" id=\"topic\" name=\"topic\" \
         placeholder=\"e.g. Electricity, Photosynthesis\" value=\"{}\">",
        escape_html(&form.topic)
    );

    html.push_str(
        "<label class=\"field\" for=\"difficulty\">Difficulty Level</label>\
         <select id=\"difficulty\" name=\"difficulty\">\n",
    );
    for d in Difficulty::ALL {
        let selected = if d == form.difficulty { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{selected}>{}</option>",
            d.as_str(),
            d.label()
        );
    }
    html.push_str("</select>\n");

    if let Some(error) = &snapshot.error {
        let _ = writeln!(
            html,
            "<div class=\"error-banner\" role=\"alert\">{}</div>",
            escape_html(error)
        );
    }

    if snapshot.loading {
        html.push_str("<button type=\"submit\" class=\"primary\" disabled>Generating...</button>\n");
    } else {
        html.push_str("<button type=\"submit\" class=\"primary\">Generate Plan</button>\n");
    }

    html.push_str("</form>\n</aside>\n");
}
