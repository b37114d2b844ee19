use crate::models::{CommentView, ProfileView};

const PROFILE_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/profile.html"));

/// Renders the profile page. Every interpolated value is HTML-escaped.
pub fn profile_page(profile: &ProfileView) -> String {
    let comments: String = profile.comments.iter().map(comment_item).collect();
    let opt = |v: &Option<String>| escape(v.as_deref().unwrap_or(""));

    PROFILE_TEMPLATE
        .replace("{name}", &opt(&profile.name))
        .replace("{image}", &escape(&profile.image))
        .replace("{description}", &opt(&profile.description))
        .replace("{mbti}", &opt(&profile.mbti))
        .replace("{enneagram}", &opt(&profile.enneagram))
        .replace("{variant}", &opt(&profile.variant))
        .replace("{tritype}", &opt(&profile.tritype))
        .replace("{socionics}", &opt(&profile.socionics))
        .replace("{sloan}", &opt(&profile.sloan))
        .replace("{psyche}", &opt(&profile.psyche))
        .replace("{comment_count}", &profile.comments.len().to_string())
        .replace("{comments}", &comments)
}

fn comment_item(comment: &CommentView) -> String {
    let tags: Vec<String> = [&comment.mbti, &comment.enneagram, &comment.zodiac]
        .into_iter()
        .flatten()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape(tag)))
        .collect();

    format!(
        "                <li class=\"comment\"><p>{}</p>{}<span class=\"likes\">{} likes</span><time datetime=\"{ts}\">{ts}</time></li>\n",
        escape(&comment.comment),
        tags.join(""),
        comment.likes,
        ts = comment.created_at.to_rfc3339(),
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            c => out.push(c),
        }
    }
    out
}
