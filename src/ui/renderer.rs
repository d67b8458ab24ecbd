//! Renders a [`UIViewModel`] into an ANSI-styled block of text.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → String
//! ```

use crate::app::AppState;
use crate::ui::helpers::push_highlighted;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DetailPanel, ProductCard, ReviewsBlock, SentimentBlock, StatusBanner, UIViewModel,
};

/// Renders the whole screen for `state`.
#[must_use]
pub fn render(state: &AppState, theme: &Theme) -> String {
    render_viewmodel(&state.compute_viewmodel(), theme)
}

#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme) -> String {
    let mut out = String::new();
    let reset = Theme::reset();

    out.push_str(&format!(
        "{}{}{}{reset}\n",
        Theme::bold(),
        Theme::fg(&theme.colors.header_fg),
        vm.header.title
    ));

    if let Some(search) = &vm.search_bar {
        let marker = if search.pending { " …" } else { "" };
        out.push_str(&format!("  search: {}{marker}\n", search.query));
    }

    match &vm.status {
        Some(StatusBanner::Loading { message }) => {
            out.push_str(&format!("  {}{message}{reset}\n", Theme::dim()));
        }
        Some(StatusBanner::Failed { message, hint }) => {
            out.push_str(&format!(
                "  {}✗ {message}{reset}\n  {}{hint}{reset}\n",
                Theme::fg(&theme.colors.error_fg),
                Theme::dim()
            ));
        }
        None => {}
    }

    if let Some(detail) = &vm.detail {
        render_detail(&mut out, detail, theme);
    } else if let Some(empty) = &vm.empty_state {
        out.push_str(&format!(
            "\n  {}{}{reset}\n  {}{}{reset}\n",
            Theme::fg(&theme.colors.empty_state_fg),
            empty.message,
            Theme::dim(),
            empty.subtitle
        ));
    } else {
        for card in &vm.cards {
            render_card(&mut out, card, theme);
        }
    }

    out.push_str(&format!(
        "{}{}{reset}\n",
        Theme::fg(&theme.colors.text_dim),
        vm.footer.keybindings
    ));
    out
}

fn render_card(out: &mut String, card: &ProductCard, theme: &Theme) {
    let reset = Theme::reset();
    let marker = if card.is_selected { "▶" } else { " " };

    out.push_str(&format!("{marker} {:>5}  ", format!("#{}", card.id)));
    push_highlighted(out, &card.name, &card.highlight_ranges, theme);
    out.push_str(&format!(
        "\n         {}{}{reset}",
        Theme::fg(&theme.colors.price_fg),
        card.price
    ));
    if let Some(original) = &card.original_price {
        out.push_str(&format!(" {}{}{original}{reset}", Theme::dim(), Theme::strike()));
    }
    if let Some(badge) = &card.discount_badge {
        out.push_str(&format!(" {}{badge}{reset}", Theme::fg(&theme.colors.discount_fg)));
    }
    out.push_str(&format!(
        "  {}{} · {}{reset}\n",
        Theme::dim(),
        card.category,
        card.stock
    ));
}

fn render_detail(out: &mut String, detail: &DetailPanel, theme: &Theme) {
    let reset = Theme::reset();
    match detail {
        DetailPanel::Resolving { product } => {
            out.push_str(&format!("  {}Loading product #{product}...{reset}\n", Theme::dim()));
        }
        DetailPanel::LookupFailed { message } => {
            out.push_str(&format!(
                "  {}✗ {message}{reset}\n",
                Theme::fg(&theme.colors.error_fg)
            ));
        }
        DetailPanel::Open {
            name,
            category,
            price,
            original_price,
            stock,
            average_rating,
            stars,
            review_count,
            reviews,
            sentiment,
        } => {
            out.push_str(&format!("\n  {}{name}{reset}\n", Theme::bold()));
            out.push_str(&format!(
                "  {category} · {}{price}{reset}",
                Theme::fg(&theme.colors.price_fg)
            ));
            if let Some(original) = original_price {
                out.push_str(&format!(" {}{}{original}{reset}", Theme::dim(), Theme::strike()));
            }
            out.push_str(&format!(" · stock {stock}\n"));
            out.push_str(&format!(
                "  {stars} {average_rating} ({review_count} reviews)\n"
            ));

            match sentiment {
                SentimentBlock::Loading => {
                    out.push_str(&format!("  {}sentiment: loading...{reset}\n", Theme::dim()));
                }
                SentimentBlock::Unavailable | SentimentBlock::Empty => {}
                SentimentBlock::Summary { rows, dominant } => {
                    out.push_str("  sentiment:");
                    for (tone, percent) in rows {
                        out.push_str(&format!(
                            " {}{} {percent}%{reset}",
                            theme.tone_fg(*tone),
                            tone.label()
                        ));
                    }
                    out.push_str(&format!(
                        "  → {}{}{}{reset}\n",
                        Theme::bold(),
                        theme.tone_fg(*dominant),
                        dominant.label()
                    ));
                }
            }

            match reviews {
                ReviewsBlock::Loading => {
                    out.push_str(&format!("  {}reviews: loading...{reset}\n", Theme::dim()));
                }
                ReviewsBlock::Unavailable => {}
                ReviewsBlock::Empty => {
                    out.push_str(&format!("  {}no reviews yet{reset}\n", Theme::dim()));
                }
                ReviewsBlock::Items(items) => {
                    for item in items {
                        out.push_str(&format!(
                            "  {} {}{}{reset}  {}\n",
                            item.stars,
                            Theme::dim(),
                            item.date,
                            item.body
                        ));
                    }
                }
            }
        }
    }
}
