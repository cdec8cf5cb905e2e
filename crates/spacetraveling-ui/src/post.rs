//! Post preview components.

use leptos::prelude::*;
use spacetraveling_core::{PostPreview, icons};

/// Icons shown next to post metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoIcon {
    Calendar,
    User,
    Clock,
}

impl InfoIcon {
    /// Inline SVG markup of the icon.
    pub fn svg(self) -> &'static str {
        match self {
            Self::Calendar => icons::CALENDAR,
            Self::User => icons::USER,
            Self::Clock => icons::CLOCK,
        }
    }
}

/// One metadata entry with its icon.
#[component]
pub fn PostInfo(
    /// Icon in front of the text.
    icon: InfoIcon,
    /// Text to display.
    text: String,
) -> impl IntoView {
    view! {
      <span>
        <span class="icon" inner_html=icon.svg()></span>
        {text}
      </span>
    }
}

/// A post in the listing: title, subtitle, date and author, linking to the
/// post page.
#[component]
pub fn PostPreviewCard(
    /// The post to show.
    post: PostPreview,
) -> impl IntoView {
    let PostPreview {
        href,
        title,
        subtitle,
        author,
        published,
        ..
    } = post;

    view! {
      <a class="post" href=href>
        <h1>{title}</h1>
        <p>{subtitle}</p>
        <div class="info">
          <PostInfo icon=InfoIcon::Calendar text=published />
          <PostInfo icon=InfoIcon::User text=author />
        </div>
      </a>
    }
}
