use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::InputEvent;
use yew::prelude::*;

use crate::api;
use crate::components::date_range::DateRangePicker;
use crate::components::layout::{icon_plus, icon_wallet, page_shell};
use crate::dates::{parse_input_date, today, DateRange};
use crate::models::{
    default_categories, emoji_for, format_currency, parse_amount, resolve_category, Category,
    Transaction, TransactionKind, CUSTOM_CATEGORY,
};
use crate::session::SessionHandle;

#[derive(Properties, PartialEq)]
pub struct TransactionsPageProps {
    pub kind: TransactionKind,
}

/// Fetch the list for a range, tagged with a generation so a slow response
/// that has been superseded by a newer range edit is discarded.
#[allow(clippy::too_many_arguments)]
fn load_range(
    kind: TransactionKind,
    range: DateRange,
    generation: Rc<RefCell<u32>>,
    list: UseStateHandle<Vec<Transaction>>,
    loading: UseStateHandle<bool>,
    error: UseStateHandle<Option<String>>,
    session: Option<SessionHandle>,
) {
    let current = {
        let mut gen = generation.borrow_mut();
        *gen += 1;
        *gen
    };
    loading.set(true);

    spawn_local(async move {
        let result = api::transactions_by_range(kind, &range).await;
        if *generation.borrow() != current {
            return;
        }
        match result {
            Ok(mut items) => {
                items.sort_by(|a, b| b.date.cmp(&a.date));
                list.set(items);
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
}

#[function_component(TransactionsPage)]
pub fn transactions_page(props: &TransactionsPageProps) -> Html {
    let kind = props.kind;
    let session = use_context::<SessionHandle>();

    let range = use_state(|| DateRange::current_month(today()));
    let list = use_state(Vec::<Transaction>::new);
    let loading = use_state(|| true);
    let list_error = use_state(|| None::<String>);
    let generation = use_mut_ref(|| 0u32);

    let categories = use_state(|| default_categories());

    let show_form = use_state(|| false);
    let editing_id = use_state(|| None::<i64>);
    let form_date = use_state(|| today().format("%Y-%m-%d").to_string());
    let form_amount = use_state(String::new);
    let form_category = use_state(String::new);
    let form_custom = use_state(String::new);
    let form_description = use_state(String::new);
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    {
        let categories = categories.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::categories().await {
                        Ok(set) => categories.set(set),
                        Err(err) => {
                            // Keep the predefined fallback set.
                            gloo_console::warn!(format!("categories fetch failed: {}", err));
                        }
                    }
                });
                || ()
            },
            (),
        );
    }

    {
        let list = list.clone();
        let loading = loading.clone();
        let list_error = list_error.clone();
        let generation = generation.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |range: &DateRange| {
                load_range(kind, *range, generation, list, loading, list_error, session);
                || ()
            },
            *range,
        );
    }

    let kind_categories: Vec<Category> = categories.for_kind(kind).to_vec();
    let total: f64 = list.iter().map(|t| t.amount).sum();

    let on_range_change = {
        let range = range.clone();
        Callback::from(move |next: DateRange| range.set(next))
    };

    let reset_form = {
        let show_form = show_form.clone();
        let editing_id = editing_id.clone();
        let form_date = form_date.clone();
        let form_amount = form_amount.clone();
        let form_category = form_category.clone();
        let form_custom = form_custom.clone();
        let form_description = form_description.clone();
        let form_error = form_error.clone();
        Callback::from(move |_: ()| {
            show_form.set(false);
            editing_id.set(None);
            form_date.set(today().format("%Y-%m-%d").to_string());
            form_amount.set(String::new());
            form_category.set(String::new());
            form_custom.set(String::new());
            form_description.set(String::new());
            form_error.set(None);
        })
    };

    let on_toggle_form = {
        let show_form = show_form.clone();
        let reset_form = reset_form.clone();
        Callback::from(move |_| {
            if *show_form {
                reset_form.emit(());
            } else {
                show_form.set(true);
            }
        })
    };

    let on_edit = {
        let show_form = show_form.clone();
        let editing_id = editing_id.clone();
        let form_date = form_date.clone();
        let form_amount = form_amount.clone();
        let form_category = form_category.clone();
        let form_custom = form_custom.clone();
        let form_description = form_description.clone();
        let form_error = form_error.clone();
        let known: Vec<String> = kind_categories.iter().map(|c| c.name.clone()).collect();
        Callback::from(move |item: Transaction| {
            editing_id.set(item.id);
            form_date.set(item.date.format("%Y-%m-%d").to_string());
            form_amount.set(format!("{}", item.amount));
            if known.iter().any(|name| *name == item.category) {
                form_category.set(item.category.clone());
                form_custom.set(String::new());
            } else {
                form_category.set(CUSTOM_CATEGORY.to_string());
                form_custom.set(item.category.clone());
            }
            form_description.set(item.description.clone().unwrap_or_default());
            form_error.set(None);
            show_form.set(true);
        })
    };

    let on_delete = {
        let list = list.clone();
        let list_error = list_error.clone();
        let session = session.clone();
        Callback::from(move |id: i64| {
            let confirmed = web_sys::window()
                .map(|w| {
                    w.confirm_with_message(&format!(
                        "Are you sure you want to delete this {} record?",
                        kind.label().to_lowercase()
                    ))
                    .unwrap_or(false)
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let list = list.clone();
            let list_error = list_error.clone();
            let session = session.clone();
            spawn_local(async move {
                let result = api::delete_transaction(kind, id).await;
                // A 404 means the record is already gone server-side, so the
                // local removal still applies.
                match result {
                    Ok(()) => {
                        let next: Vec<Transaction> = (*list)
                            .iter()
                            .filter(|t| t.id != Some(id))
                            .cloned()
                            .collect();
                        list.set(next);
                    }
                    Err(err) if err.is_not_found() => {
                        let next: Vec<Transaction> = (*list)
                            .iter()
                            .filter(|t| t.id != Some(id))
                            .cloned()
                            .collect();
                        list.set(next);
                    }
                    Err(err) => {
                        if err.is_unauthorized() {
                            if let Some(session) = session {
                                session.expire();
                            }
                            return;
                        }
                        list_error.set(Some(format!(
                            "Failed to delete {} record: {}",
                            kind.label().to_lowercase(),
                            err
                        )));
                    }
                }
            });
        })
    };

    let on_submit = {
        let editing_id = editing_id.clone();
        let form_date = form_date.clone();
        let form_amount = form_amount.clone();
        let form_category = form_category.clone();
        let form_custom = form_custom.clone();
        let form_description = form_description.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        let reset_form = reset_form.clone();
        let range = range.clone();
        let list = list.clone();
        let loading = loading.clone();
        let list_error = list_error.clone();
        let generation = generation.clone();
        let session = session.clone();
        let kind_categories = kind_categories.clone();

        Callback::from(move |_| {
            let date = match parse_input_date(&form_date) {
                Some(date) => date,
                None => {
                    form_error.set(Some("Date is required.".to_string()));
                    return;
                }
            };

            let amount = match parse_amount(&form_amount) {
                Ok(amount) => amount,
                Err(msg) => {
                    form_error.set(Some(msg));
                    return;
                }
            };

            let category = resolve_category(&form_category, &form_custom);
            if category.is_empty() {
                form_error.set(Some("Category is required.".to_string()));
                return;
            }

            let emoji = kind_categories
                .iter()
                .find(|c| c.name == category)
                .map(|c| c.emoji.clone())
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| emoji_for(&category, kind).to_string());

            let description = form_description.trim().to_string();
            let payload = Transaction {
                id: *editing_id,
                date,
                category,
                amount,
                description: if description.is_empty() {
                    None
                } else {
                    Some(description)
                },
                emoji: Some(emoji),
            };

            form_error.set(None);
            saving.set(true);

            let editing = *editing_id;
            let form_error = form_error.clone();
            let saving = saving.clone();
            let reset_form = reset_form.clone();
            let range = range.clone();
            let list = list.clone();
            let loading = loading.clone();
            let list_error = list_error.clone();
            let generation = generation.clone();
            let session = session.clone();
            spawn_local(async move {
                let result = match editing {
                    Some(id) => api::update_transaction(kind, id, &payload).await,
                    None => api::create_transaction(kind, &payload).await,
                };
                saving.set(false);
                match result {
                    Ok(_) => {
                        reset_form.emit(());
                        load_range(
                            kind, *range, generation, list, loading, list_error, session,
                        );
                    }
                    Err(err) => {
                        if err.is_unauthorized() {
                            if let Some(session) = session {
                                session.expire();
                            }
                            return;
                        }
                        form_error.set(Some(err.to_string()));
                    }
                }
            });
        })
    };

    let on_category_change = {
        let form_category = form_category.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlSelectElement = e.target_unchecked_into();
            form_category.set(input.value());
        })
    };

    let page_title = match kind {
        TransactionKind::Income => "Income",
        TransactionKind::Expense => "Expenses",
    };
    let total_label = match kind {
        TransactionKind::Income => "Total Income for Range",
        TransactionKind::Expense => "Total Expenses for Range",
    };

    html! {
        { page_shell(
            page_title,
            html! {
                <button onclick={on_toggle_form} class="flex items-center gap-2 bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all">
                    { icon_plus() }
                    { if *show_form { "Close" } else { match kind {
                        TransactionKind::Income => "Add Income",
                        TransactionKind::Expense => "Add Expense",
                    } } }
                </button>
            },
            html! {
                <>
                    <DateRangePicker range={*range} on_change={on_range_change} />

                    <div class="bg-white p-5 rounded-[10px] shadow-sm border border-white/50 flex flex-col justify-center">
                        <div class="flex items-center gap-2 mb-1">
                            <div class="p-1.5 bg-[#f1f5f9] rounded-lg">{ icon_wallet() }</div>
                            <span class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ total_label }</span>
                        </div>
                        <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ format_currency(total) }</h3>
                    </div>

                    {
                        if *show_form {
                            html! {
                                <div class="bg-white p-5 rounded-[10px] shadow-sm border border-white/50">
                                    <h4 class="text-[#1D617A] font-bold text-[15px] mb-3 tracking-wider">
                                        { if editing_id.is_some() { "Edit Record" } else { "Add New Record" } }
                                    </h4>
                                    <div class="grid grid-cols-2 md:grid-cols-4 gap-3 mb-4">
                                        <div class="space-y-1">
                                            <label class="text-[12px] font-bold text-muted-foreground">{"Date"}</label>
                                            <input type="date" value={(*form_date).clone()} oninput={{
                                                let form_date = form_date.clone();
                                                Callback::from(move |e: InputEvent| {
                                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                                    form_date.set(input.value());
                                                })
                                            }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                                        </div>
                                        <div class="space-y-1">
                                            <label class="text-[12px] font-bold text-muted-foreground">{"Amount ($)"}</label>
                                            <input type="number" min="0.01" step="0.01" placeholder="0.00" value={(*form_amount).clone()} oninput={{
                                                let form_amount = form_amount.clone();
                                                Callback::from(move |e: InputEvent| {
                                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                                    form_amount.set(input.value());
                                                })
                                            }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                                        </div>
                                        <div class="space-y-1">
                                            <label class="text-[12px] font-bold text-muted-foreground">{"Category"}</label>
                                            <select onchange={on_category_change} class="w-full bg-[#f1f4f9] border-2 border-transparent rounded-[10px] px-3 py-2 text-[11px] focus:ring-2 focus:ring-[#1D617A] outline-none">
                                                <option value="" selected={form_category.is_empty()} disabled={true}>{"Select category"}</option>
                                                { for kind_categories.iter().map(|c| html! {
                                                    <option value={c.name.clone()} selected={*form_category == c.name}>
                                                        { format!("{} {}", c.emoji, c.name) }
                                                    </option>
                                                }) }
                                                <option value={CUSTOM_CATEGORY} selected={*form_category == CUSTOM_CATEGORY}>{"Custom..."}</option>
                                            </select>
                                        </div>
                                        <div class="space-y-1">
                                            <label class="text-[12px] font-bold text-muted-foreground">{"Description"}</label>
                                            <input type="text" placeholder="Optional" value={(*form_description).clone()} oninput={{
                                                let form_description = form_description.clone();
                                                Callback::from(move |e: InputEvent| {
                                                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                                    form_description.set(input.value());
                                                })
                                            }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                                        </div>
                                    </div>
                                    {
                                        if *form_category == CUSTOM_CATEGORY {
                                            html! {
                                                <div class="space-y-1 mb-4">
                                                    <label class="text-[12px] font-bold text-muted-foreground">{"Custom Category"}</label>
                                                    <input type="text" placeholder="Type a category name" value={(*form_custom).clone()} oninput={{
                                                        let form_custom = form_custom.clone();
                                                        Callback::from(move |e: InputEvent| {
                                                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                                            form_custom.set(input.value());
                                                        })
                                                    }} class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none" />
                                                </div>
                                            }
                                        } else { html! {} }
                                    }
                                    <div class="flex gap-3">
                                        <button onclick={on_submit} class="flex-1 bg-[#173E63] text-white py-2 rounded-[10px] text-[10px] font-bold flex items-center justify-center gap-2" disabled={*saving}>
                                            { if *saving { "Saving..." } else if editing_id.is_some() { "Update" } else { "Save" } }
                                        </button>
                                        <button onclick={{
                                            let reset_form = reset_form.clone();
                                            Callback::from(move |_| reset_form.emit(()))
                                        }} class="flex-1 bg-[#B2CBDE] text-[#173E63] py-2 rounded-[10px] text-[10px] font-bold flex items-center justify-center gap-2">{"Cancel"}</button>
                                    </div>
                                    {
                                        if let Some(msg) = &*form_error {
                                            html! { <p class="text-sm text-red-500 mt-3">{ msg.clone() }</p> }
                                        } else { html! {} }
                                    }
                                </div>
                            }
                        } else { html! {} }
                    }

                    {
                        if let Some(msg) = &*list_error {
                            html! { <p class="text-sm text-red-500">{ msg.clone() }</p> }
                        } else { html! {} }
                    }

                    <div class="bg-white rounded-[10px] shadow-sm border border-white/50 overflow-hidden">
                        <div class="p-5 border-b border-border">
                            <h3 class="font-bold text-lg text-foreground">{ format!("{} History", kind.label()) }</h3>
                        </div>
                        <div class="overflow-x-auto">
                            <table class="w-full text-left border-collapse">
                                <thead>
                                    <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                        <th class="px-8 py-4 font-bold">{"Date"}</th>
                                        <th class="px-8 py-4 font-bold">{"Category"}</th>
                                        <th class="px-8 py-4 font-bold">{"Description"}</th>
                                        <th class="px-8 py-4 font-bold text-right">{"Amount"}</th>
                                        <th class="px-8 py-4 font-bold text-right">{"Actions"}</th>
                                    </tr>
                                </thead>
                                <tbody class="divide-y divide-border">
                                    { if *loading {
                                        html! { <tr><td colspan="5" class="px-8 py-6 text-center text-muted-foreground">{"Loading..."}</td></tr> }
                                    } else if list.is_empty() {
                                        html! { <tr><td colspan="5" class="px-8 py-6 text-center text-muted-foreground">{ format!("No {} records in this range.", kind.label().to_lowercase()) }</td></tr> }
                                    } else {
                                        html! {
                                            <>
                                                { for list.iter().map(|item| {
                                                    let emoji = item.emoji.clone()
                                                        .filter(|e| !e.is_empty())
                                                        .unwrap_or_else(|| emoji_for(&item.category, kind).to_string());
                                                    let edit_item = item.clone();
                                                    let on_edit = on_edit.clone();
                                                    let on_delete = on_delete.clone();
                                                    let id = item.id;
                                                    html! {
                                                        <tr class="text-sm hover:bg-muted/40 transition-colors group">
                                                            <td class="px-8 py-4 text-muted-foreground">{ item.date.format("%Y-%m-%d").to_string() }</td>
                                                            <td class="px-8 py-4">
                                                                <span class="bg-secondary text-secondary-foreground px-2.5 py-1 rounded-md text-[9px] font-bold">
                                                                    { format!("{} {}", emoji, item.category) }
                                                                </span>
                                                            </td>
                                                            <td class="px-8 py-4 text-foreground">{ item.description.clone().unwrap_or_default() }</td>
                                                            <td class="px-8 py-4 text-right font-semibold text-foreground">{ format_currency(item.amount) }</td>
                                                            <td class="px-8 py-4 text-right space-x-2">
                                                                <button class="text-[#1D617A] text-xs font-bold" onclick={Callback::from(move |_| on_edit.emit(edit_item.clone()))}>{"Edit"}</button>
                                                                {
                                                                    if let Some(id) = id {
                                                                        html! {
                                                                            <button class="text-red-600 text-xs font-bold" onclick={Callback::from(move |_| on_delete.emit(id))}>{"Delete"}</button>
                                                                        }
                                                                    } else { html! {} }
                                                                }
                                                            </td>
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
