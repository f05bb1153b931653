//! HTML email templates.
//!
//! Pure rendering: post data in, HTML document out, no side effects. Both
//! templates embed the canonical public deep link to each post.

use askama::Template;
use time::OffsetDateTime;

use crate::domain::entities::{PostDetailRecord, PostSummaryRecord};

#[derive(Template)]
#[template(path = "email/post_announcement.html")]
pub struct PostAnnouncementTemplate {
    pub title: String,
    pub date: String,
    pub category: String,
    pub excerpt: String,
    pub image: String,
    pub link: String,
    pub year: i32,
}

pub struct DigestEntry {
    pub title: String,
    pub date: String,
    pub category: String,
    pub excerpt: String,
    pub link: String,
}

#[derive(Template)]
#[template(path = "email/digest.html")]
pub struct DigestTemplate {
    pub entries: Vec<DigestEntry>,
    pub year: i32,
}

fn post_link(public_url: &str, id: &uuid::Uuid) -> String {
    format!("{}/blog/{id}", public_url.trim_end_matches('/'))
}

fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

pub fn render_post_announcement(
    post: &PostDetailRecord,
    public_url: &str,
) -> Result<String, askama::Error> {
    PostAnnouncementTemplate {
        title: post.title.clone(),
        date: post.date.clone(),
        category: post.category.clone(),
        excerpt: post.excerpt.clone(),
        image: post.image.clone(),
        link: post_link(public_url, &post.id),
        year: current_year(),
    }
    .render()
}

pub fn render_digest(
    posts: &[PostSummaryRecord],
    public_url: &str,
) -> Result<String, askama::Error> {
    DigestTemplate {
        entries: posts
            .iter()
            .map(|post| DigestEntry {
                title: post.title.clone(),
                date: post.date.clone(),
                category: post.category.clone(),
                excerpt: post.excerpt.clone(),
                link: post_link(public_url, &post.id),
            })
            .collect(),
        year: current_year(),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn detail() -> PostDetailRecord {
        PostDetailRecord {
            id: Uuid::new_v4(),
            title: "Sleep & memory".into(),
            excerpt: "What a night of rest does".into(),
            content: "Full body".into(),
            date: "07 Mar 2026".into(),
            category: "Research".into(),
            image: "https://cdn.example/cover.jpg".into(),
            author: "Editorial Desk".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn announcement_embeds_deep_link_and_escapes_text() {
        let post = detail();
        let html = render_post_announcement(&post, "https://site.example/").expect("render");
        assert!(html.contains(&format!("https://site.example/blog/{}", post.id)));
        // Title passed through HTML escaping.
        assert!(html.contains("Sleep &amp; memory"));
        assert!(html.contains("https://cdn.example/cover.jpg"));
    }

    #[test]
    fn digest_lists_every_post_once() {
        let posts: Vec<PostSummaryRecord> = (0..3)
            .map(|i| PostSummaryRecord {
                id: Uuid::new_v4(),
                title: format!("Post {i}"),
                excerpt: format!("Excerpt {i}"),
                date: "07 Mar 2026".into(),
                category: "General".into(),
                image: "cover".into(),
                author: "Editorial Desk".into(),
                created_at: OffsetDateTime::now_utc(),
            })
            .collect();

        let html = render_digest(&posts, "https://site.example").expect("render");
        for post in &posts {
            assert!(html.contains(&post.title));
            assert!(html.contains(&format!("/blog/{}", post.id)));
        }
    }
}
