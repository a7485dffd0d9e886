//! HTML pages for the board. Plain string building; every piece of user text
//! goes through [`escape_html`].

use std::fmt::Write;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use service::entry::{service::SortOrder, Entry};

const UPVOTE_SCRIPT: &str = r#"<script>
document.addEventListener('click', function (ev) {
  var link = ev.target.closest('a.upvote');
  if (!link) return;
  ev.preventDefault();
  fetch(link.getAttribute('href'), { credentials: 'same-origin' }).then(function (res) {
    if (res.ok) {
      var count = link.parentNode.querySelector('.count');
      count.textContent = String(Number(count.textContent) + 1);
    }
    link.classList.add('voted');
  });
});
</script>"#;

/// `Mar 05, 2024`
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%b %d, %Y").to_string()
}

/// Escape HTML special characters.
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

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n</head>\n<body>\n<header><h1><a href=\"/\">Why I regret</a></h1>\
         <nav><a href=\"/\">Newest</a> · <a href=\"/sort-by-upvotes\">Most upvoted</a> · \
         <a href=\"/add\">Add yours</a></nav></header>\n<main>\n{}</main>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body,
        UPVOTE_SCRIPT
    )
}

fn entry_item(out: &mut String, entry: &Entry) {
    let _ = write!(
        out,
        "<article class=\"entry\" id=\"entry-{id}\">\n<p class=\"why\"><a href=\"/{id}\">{why}</a></p>\n",
        id = entry.id,
        why = escape_html(&entry.why)
    );
    if let Some(regret) = entry.regret.as_deref() {
        let _ = writeln!(out, "<p class=\"regret\">{}</p>", escape_html(regret));
    }
    let _ = write!(
        out,
        "<footer><span class=\"count\">{upvotes}</span> \
         <a class=\"upvote\" href=\"/upvote/{id}\" rel=\"nofollow\">upvote</a> \
         <time datetime=\"{iso}\">{date}</time></footer>\n</article>\n",
        upvotes = entry.upvotes,
        id = entry.id,
        iso = entry.created.to_rfc3339(),
        date = format_date(&entry.created)
    );
}

fn entry_list(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return "<p class=\"empty\">Nothing here yet. <a href=\"/add\">Be the first.</a></p>\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        entry_item(&mut out, entry);
    }
    out
}

pub fn index_page(entries: &[Entry], order: SortOrder) -> String {
    let heading = match order {
        SortOrder::Recent => "Newest",
        SortOrder::Popular => "Most upvoted",
    };
    let body = format!("<h2>{}</h2>\n{}", heading, entry_list(entries));
    layout(heading, &body)
}

pub fn entry_page(entry: &Entry) -> String {
    let mut body = String::new();
    entry_item(&mut body, entry);
    layout(&entry.why, &body)
}

pub fn add_page() -> String {
    let body = "<h2>Add yours</h2>\n<form method=\"post\" action=\"/add\">\n\
        <label>Why <input name=\"why\" required maxlength=\"500\"></label>\n\
        <label>Regret <textarea name=\"regret\" maxlength=\"2000\"></textarea></label>\n\
        <button type=\"submit\">Submit</button>\n</form>\n";
    layout("Add yours", body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h2>{} {}</h2>\n<p>{}</p>\n",
        status.as_u16(),
        escape_html(title),
        escape_html(message)
    );
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: i32, why: &str, regret: Option<&str>) -> Entry {
        Entry {
            id,
            why: why.to_string(),
            regret: regret.map(str::to_string),
            upvotes: 3,
            created: Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn date_format_matches_board_style() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 0).unwrap();
        assert_eq!(format_date(&ts), "Mar 05, 2024");
    }

    #[test]
    fn user_text_is_escaped() {
        let html = entry_page(&entry(1, "<script>alert('x')</script>", Some("a & b")));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn index_lists_entries_in_given_order() {
        let html = index_page(&[entry(2, "second", None), entry(1, "first", None)], SortOrder::Popular);
        let a = html.find("second").unwrap();
        let b = html.find("first").unwrap();
        assert!(a < b);
        assert!(html.contains("href=\"/upvote/2\""));
        assert!(html.contains("Most upvoted"));
    }

    #[test]
    fn missing_regret_renders_no_paragraph() {
        let html = entry_page(&entry(1, "why", None));
        assert!(!html.contains("class=\"regret\""));
    }

    #[test]
    fn empty_index_invites_first_entry() {
        assert!(index_page(&[], SortOrder::Recent).contains("Be the first"));
    }
}
