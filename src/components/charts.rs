use yew::prelude::*;

use crate::models::{emoji_for, format_currency, CategoryTotal, TransactionKind};

const PALETTE: [&str; 8] = [
    "#173E63", "#1D617A", "#28a745", "#fd7e14", "#e83e8c", "#6f42c1", "#17a2b8", "#dc3545",
];

#[derive(Properties, PartialEq)]
pub struct CategoryBreakdownProps {
    pub title: &'static str,
    pub entries: Vec<CategoryTotal>,
    pub kind: TransactionKind,
}

/// Per-category breakdown rendered as inline SVG bars, widest bar = largest
/// category.
#[function_component(CategoryBreakdown)]
pub fn category_breakdown(props: &CategoryBreakdownProps) -> Html {
    let max = props
        .entries
        .iter()
        .map(|e| e.amount)
        .fold(0.0_f64, f64::max);

    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border">
            <h3 class="font-bold text-foreground text-lg mb-4">{ props.title }</h3>
            { if props.entries.is_empty() {
                html! { <p class="text-sm text-muted-foreground">{"No data for this range."}</p> }
            } else {
                html! {
                    <div class="space-y-3">
                        { for props.entries.iter().enumerate().map(|(idx, entry)| {
                            let percent = if max > 0.0 { entry.amount / max * 100.0 } else { 0.0 };
                            let color = PALETTE[idx % PALETTE.len()];
                            html! {
                                <div class="space-y-1">
                                    <div class="flex items-center justify-between text-sm">
                                        <span class="text-foreground">
                                            { emoji_for(&entry.category, props.kind) }
                                            { " " }
                                            { entry.category.clone() }
                                        </span>
                                        <span class="font-semibold text-foreground">{ format_currency(entry.amount) }</span>
                                    </div>
                                    <svg width="100%" height="8">
                                        <rect width="100%" height="8" rx="4" fill="#e2e8f0" />
                                        <rect width={format!("{}%", percent.round())} height="8" rx="4" fill={color} />
                                    </svg>
                                </div>
                            }
                        }) }
                    </div>
                }
            }}
        </div>
    }
}
