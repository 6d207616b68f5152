use web_sys::InputEvent;
use yew::prelude::*;

use crate::dates::{parse_input_date, today, DateRange, RangePreset};

#[derive(Properties, PartialEq)]
pub struct DateRangePickerProps {
    pub range: DateRange,
    pub on_change: Callback<DateRange>,
}

/// Shared start/end date control. Manual edits that would invert the range
/// snap the other bound instead; presets are computed from the current date
/// at click time.
#[function_component(DateRangePicker)]
pub fn date_range_picker(props: &DateRangePickerProps) -> Html {
    let on_start = {
        let range = props.range;
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            if let Some(date) = parse_input_date(&input.value()) {
                on_change.emit(range.with_start(date));
            }
        })
    };

    let on_end = {
        let range = props.range;
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            if let Some(date) = parse_input_date(&input.value()) {
                on_change.emit(range.with_end(date));
            }
        })
    };

    let presets = [
        ("Today", RangePreset::Today),
        ("This Week", RangePreset::ThisWeek),
        ("This Month", RangePreset::ThisMonth),
        ("Last Month", RangePreset::LastMonth),
        ("This Year", RangePreset::ThisYear),
    ];

    html! {
        <div class="bg-card rounded-[10px] p-4 border border-border space-y-3">
            <div class="flex flex-wrap gap-2">
                { for presets.iter().map(|(label, preset)| {
                    let on_change = props.on_change.clone();
                    let preset = *preset;
                    html! {
                        <button
                            type="button"
                            class="bg-[#D8E1E8] text-[#173E63] px-3 py-1.5 rounded-[10px] text-[11px] font-bold hover:opacity-80 transition-all"
                            onclick={Callback::from(move |_| on_change.emit(DateRange::preset(preset, today())))}
                        >
                            { *label }
                        </button>
                    }
                }) }
            </div>
            <div class="grid grid-cols-2 gap-3">
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"From"}</label>
                    <input
                        type="date"
                        value={props.range.start_date.format("%Y-%m-%d").to_string()}
                        oninput={on_start}
                        class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none"
                    />
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"To"}</label>
                    <input
                        type="date"
                        value={props.range.end_date.format("%Y-%m-%d").to_string()}
                        oninput={on_end}
                        class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[11px] text-[#173E63] border-none"
                    />
                </div>
            </div>
        </div>
    }
}
