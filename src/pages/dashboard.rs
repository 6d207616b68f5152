use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::charts::CategoryBreakdown;
use crate::components::date_range::DateRangePicker;
use crate::components::layout::{
    icon_arrow_up_right, icon_credit_card, icon_wallet, page_shell,
};
use crate::dates::{today, DateRange};
use crate::models::{
    emoji_for, format_currency, merge_recent, DashboardSummary, TransactionKind,
};
use crate::session::SessionHandle;

#[derive(Clone, Copy, PartialEq)]
enum StatIcon {
    UpRight,
    CreditCard,
    Wallet,
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    title: &'static str,
    amount: f64,
    icon: StatIcon,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title }</p>
                <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ format_currency(props.amount) }</h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::UpRight => icon_arrow_up_right(),
                        StatIcon::CreditCard => icon_credit_card(),
                        StatIcon::Wallet => icon_wallet(),
                    }
                }
            </div>
        </div>
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let session = use_context::<SessionHandle>();
    let range = use_state(|| DateRange::current_month(today()));
    let summary = use_state(DashboardSummary::default);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);
    let generation = use_mut_ref(|| 0u32);

    {
        let summary = summary.clone();
        let loading = loading.clone();
        let error = error.clone();
        let generation = generation.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |range: &DateRange| {
                let current = {
                    let mut gen = generation.borrow_mut();
                    *gen += 1;
                    *gen
                };
                loading.set(true);

                let range = *range;
                spawn_local(async move {
                    let result = api::dashboard_by_range(&range).await;
                    if *generation.borrow() != current {
                        // A newer range edit superseded this fetch.
                        return;
                    }
                    match result {
                        Ok(next) => {
                            // Whole summary replaced in one write, never
                            // field by field.
                            summary.set(next);
                            error.set(None);
                        }
                        Err(err) => {
                            if err.is_unauthorized() {
                                if let Some(session) = session {
                                    session.expire();
                                }
                                return;
                            }
                            error.set(Some(err.to_string()));
                        }
                    }
                    loading.set(false);
                });
                || ()
            },
            *range,
        );
    }

    let on_range_change = {
        let range = range.clone();
        Callback::from(move |next: DateRange| range.set(next))
    };

    let recent = merge_recent(&summary.recent_incomes, &summary.recent_expenses);

    html! {
        { page_shell(
            "Dashboard",
            html! {},
            html! {
                <>
                    <DateRangePicker range={*range} on_change={on_range_change} />

                    {
                        if let Some(msg) = &*error {
                            html! { <p class="text-sm text-red-500">{ msg.clone() }</p> }
                        } else { html! {} }
                    }

                    <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                        <StatCard title="Total Income" amount={summary.total_income} icon={StatIcon::UpRight} />
                        <StatCard title="Total Expenses" amount={summary.total_expense} icon={StatIcon::CreditCard} />
                        <StatCard title="Balance" amount={summary.balance} icon={StatIcon::Wallet} />
                    </div>

                    <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                        <CategoryBreakdown
                            title="Income by Category"
                            entries={summary.income_by_category.clone()}
                            kind={TransactionKind::Income}
                        />
                        <CategoryBreakdown
                            title="Expenses by Category"
                            entries={summary.expense_by_category.clone()}
                            kind={TransactionKind::Expense}
                        />
                    </div>

                    <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
                        <div class="p-6 flex justify-between items-center border-b border-border">
                            <h3 class="font-bold text-foreground text-lg">{"Recent Transactions"}</h3>
                        </div>
                        <div class="overflow-x-auto">
                            <table class="w-full text-left border-collapse">
                                <thead>
                                    <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest">
                                        <th class="px-8 py-4 font-bold">{"Date"}</th>
                                        <th class="px-8 py-4 font-bold">{"Type"}</th>
                                        <th class="px-8 py-4 font-bold">{"Category"}</th>
                                        <th class="px-8 py-4 font-bold">{"Description"}</th>
                                        <th class="px-8 py-4 font-bold text-right">{"Amount"}</th>
                                    </tr>
                                </thead>
                                <tbody class="divide-y divide-border">
                                    { if *loading {
                                        html! { <tr><td colspan="5" class="px-8 py-6 text-center text-muted-foreground">{"Loading..."}</td></tr> }
                                    } else if recent.is_empty() {
                                        html! { <tr><td colspan="5" class="px-8 py-6 text-center text-muted-foreground">{"No transactions in this range."}</td></tr> }
                                    } else {
                                        html! {
                                            <>
                                                { for recent.iter().map(|(kind, tx)| {
                                                    let emoji = tx.emoji.clone()
                                                        .filter(|e| !e.is_empty())
                                                        .unwrap_or_else(|| emoji_for(&tx.category, *kind).to_string());
                                                    let amount_label = match kind {
                                                        TransactionKind::Income => format!("+ {}", format_currency(tx.amount)),
                                                        TransactionKind::Expense => format!("- {}", format_currency(tx.amount)),
                                                    };
                                                    let amount_class = match kind {
                                                        TransactionKind::Income => "px-8 py-4 text-right font-semibold text-green-600",
                                                        TransactionKind::Expense => "px-8 py-4 text-right font-semibold text-red-600",
                                                    };
                                                    html! {
                                                        <tr class="text-sm hover:bg-muted/30 transition-colors">
                                                            <td class="px-8 py-4 text-muted-foreground">{ tx.date.format("%Y-%m-%d").to_string() }</td>
                                                            <td class="px-8 py-4 text-foreground">{ kind.label() }</td>
                                                            <td class="px-8 py-4">
                                                                <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">
                                                                    { format!("{} {}", emoji, tx.category) }
                                                                </span>
                                                            </td>
                                                            <td class="px-8 py-4 text-foreground">{ tx.description.clone().unwrap_or_default() }</td>
                                                            <td class={amount_class}>{ amount_label }</td>
                                                        </tr>
                                                    }
                                                }) }
                                            </>
                                        }
                                    }}
                                </tbody>
                            </table>
                        </div>
                    </div>
                </>
            }
        ) }
    }
}
