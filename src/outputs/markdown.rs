//! Markdown rendering of a dashboard page.
//!
//! Each card is laid out as image, linked title, source, publish date and
//! description, followed by a horizontal rule:
//!
//! ```text
//! ![Fed holds rates](<https://example.com/fed.jpg>)
//!
//! ### [Fed holds rates](<https://example.com/fed>)
//! **Source:** Reuters
//! **Published:** 2025-05-06
//!
//! The Federal Reserve left rates unchanged.
//!
//! ---
//! ```

use crate::dashboard::{ArticleCard, Banner, DashboardView};
use crate::models::QueryParams;

pub const TITLE: &str = "# 📰 Financial News Dashboard";
pub const TAGLINE: &str = "Stay updated with the latest news in Finance, Crypto, Stocks, and ESG";

/// Render a full page: header, active filters, then cards or the error banner.
pub fn render_page(params: &QueryParams, view: &DashboardView) -> String {
    let mut md = String::new();
    md.push_str(TITLE);
    md.push_str("\n\n");
    md.push_str(TAGLINE);
    md.push_str("\n\n");
    md.push_str(&filter_summary(params));
    md.push_str("\n\n");

    match view {
        DashboardView::Cards(cards) if cards.is_empty() => {
            md.push_str("_No articles matched these filters._\n");
        }
        DashboardView::Cards(cards) => {
            for card in cards {
                md.push_str(&render_card(card));
            }
        }
        DashboardView::Banner(banner) => md.push_str(&render_banner(banner)),
    }
    md
}

pub fn filter_summary(params: &QueryParams) -> String {
    format!(
        "**Category:** {} | **Last:** {} day{} | **Articles:** {}",
        params.category,
        params.days,
        if params.days == 1 { "" } else { "s" },
        params.count
    )
}

pub fn render_card(card: &ArticleCard) -> String {
    let alt = if card.image_is_placeholder {
        "No Image"
    } else {
        card.title.as_str()
    };
    let mut md = format!(
        "![{}]({})\n\n### [{}]({})\n**Source:** {}  \n**Published:** {}\n\n",
        escape_brackets(alt),
        link_destination(&card.image),
        escape_brackets(&card.title),
        link_destination(&card.url),
        card.source,
        card.published
    );
    if !card.description.is_empty() {
        md.push_str(&card.description);
        md.push_str("\n\n");
    }
    md.push_str("---\n\n");
    md
}

pub fn render_banner(banner: &Banner) -> String {
    match banner {
        Banner::ApiError { message } => format!("> **Error:** {}\n", message),
        Banner::FetchFailed { diagnostic } => {
            format!("> **Error:** {}\n>\n> {}\n", banner.message(), diagnostic)
        }
    }
}

/// `<url>` form, so spaces and parentheses stay inside the link.
fn link_destination(url: &str) -> String {
    let url = url
        .replace('<', "%3C")
        .replace('>', "%3E")
        .replace(['\r', '\n'], "");
    format!("<{url}>")
}

/// Keep `[` / `]` in titles from breaking link syntax.
fn escape_brackets(s: &str) -> String {
    s.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::FETCH_FAILED;
    use crate::models::Category;

    fn card(title: &str, description: &str, placeholder: bool) -> ArticleCard {
        ArticleCard {
            image: if placeholder {
                "https://via.placeholder.com/300x200?text=No+Image".to_string()
            } else {
                "https://example.com/a.png".to_string()
            },
            image_is_placeholder: placeholder,
            title: title.to_string(),
            url: "https://example.com/a".to_string(),
            source: "Reuters".to_string(),
            published: "2025-05-06".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_page_has_one_block_per_card() {
        let cards = vec![card("One", "d", false), card("Two", "", true), card("Three", "d", false)];
        let page = render_page(&QueryParams::default(), &DashboardView::Cards(cards));
        assert_eq!(page.matches("### [").count(), 3);
        assert_eq!(page.matches("\n---\n").count(), 3);
        assert!(page.starts_with(TITLE));
    }

    #[test]
    fn test_card_layout() {
        let md = render_card(&card("Fed holds rates", "Rates unchanged.", false));
        assert!(md.starts_with("![Fed holds rates](<https://example.com/a.png>)"));
        assert!(md.contains("### [Fed holds rates](<https://example.com/a>)"));
        assert!(md.contains("**Source:** Reuters"));
        assert!(md.contains("**Published:** 2025-05-06"));
        assert!(md.contains("Rates unchanged."));
    }

    #[test]
    fn test_card_placeholder_alt_text() {
        let md = render_card(&card("T", "", true));
        assert!(md.starts_with("![No Image](<https://via.placeholder.com/300x200?text=No+Image>)"));
    }

    #[test]
    fn test_title_brackets_are_escaped() {
        let md = render_card(&card("[Live] Markets", "", true));
        assert!(md.contains("### [\\[Live\\] Markets]"));
    }

    #[test]
    fn test_url_with_parens_and_spaces_stays_in_link() {
        let mut c = card("Fed", "", false);
        c.url = "https://example.com/a_(b) c".to_string();
        let md = render_card(&c);
        assert!(md.contains("### [Fed](<https://example.com/a_(b) c>)\n"));
        assert_eq!(link_destination("https://x.test/<a>"), "<https://x.test/%3Ca%3E>");
    }

    #[test]
    fn test_empty_result_message() {
        let page = render_page(&QueryParams::default(), &DashboardView::Cards(vec![]));
        assert!(page.contains("No articles matched"));
    }

    #[test]
    fn test_filter_summary() {
        let params = QueryParams {
            category: Category::StockMarket,
            days: 1,
            count: 25,
        };
        assert_eq!(
            filter_summary(&params),
            "**Category:** Stock Market | **Last:** 1 day | **Articles:** 25"
        );
    }

    #[test]
    fn test_banners() {
        let api = render_banner(&Banner::ApiError {
            message: "rateLimited".to_string(),
        });
        assert_eq!(api, "> **Error:** rateLimited\n");

        let failed = render_banner(&Banner::FetchFailed {
            diagnostic: "Error fetching news: timed out".to_string(),
        });
        assert!(failed.contains(FETCH_FAILED));
        assert!(failed.contains("Error fetching news: timed out"));
    }
}
