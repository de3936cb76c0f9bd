use criterion::{Criterion, criterion_group, criterion_main};
use markdown_structedit_config::EditorConfig;
use markdown_structedit_engine::editing::{Cmd, EditorState, Selection, commands::compile};
mod common;

fn state(content: &str, selection: Selection) -> EditorState {
    EditorState::new(content, selection, EditorConfig::default())
}

fn bench_keybindings(c: &mut Criterion) {
    let mut group = c.benchmark_group("keybindings");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    let item_end = content.find("- Another item").unwrap() + "- Another item".len();
    let at_item = state(&content, Selection::cursor(item_end));

    group.bench_function("enter_in_list", |b| {
        b.iter(|| {
            let tr = compile(
                std::hint::black_box(&at_item),
                &Cmd::InsertNewlineContinueMarkup,
            );
            std::hint::black_box(tr.unwrap());
        });
    });

    let ordered = common::generate_ordered_list(1000);
    let first_end = ordered.find('\n').unwrap();
    let at_first = state(&ordered, Selection::cursor(first_end));

    group.bench_function("enter_renumbers_long_list", |b| {
        b.iter(|| {
            let tr = compile(
                std::hint::black_box(&at_first),
                &Cmd::InsertNewlineContinueMarkup,
            );
            std::hint::black_box(tr.unwrap());
        });
    });

    let after_marker = content.find("- Nested item").unwrap() + 2;
    let at_marker = state(&content, Selection::cursor(after_marker));

    group.bench_function("backspace_after_marker", |b| {
        b.iter(|| {
            let tr = compile(
                std::hint::black_box(&at_marker),
                &Cmd::DeleteMarkupBackward,
            );
            std::hint::black_box(tr.unwrap());
        });
    });

    group.bench_function("apply_and_reparse", |b| {
        let tr = compile(&at_item, &Cmd::InsertNewlineContinueMarkup).unwrap();
        b.iter(|| {
            let next = std::hint::black_box(&at_item).apply(&tr);
            std::hint::black_box(next);
        });
    });

    group.finish();
}

fn bench_toggles(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggles");
    group.sample_size(10);

    let lines = common::generate_lines(1000);
    let all = state(&lines, Selection::single(0, lines.len()));

    for (name, cmd) in [
        ("numbering_1000_lines", Cmd::ToggleNumbering),
        ("heading_1000_lines", Cmd::ToggleHeading { level: 2 }),
        ("todo_1000_lines", Cmd::ToggleTodo),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let tr = compile(std::hint::black_box(&all), &cmd);
                std::hint::black_box(tr.unwrap());
            });
        });
    }

    let content = common::generate_markdown_content(100);
    let bold = content.find("some").unwrap();
    let in_bold = state(&content, Selection::cursor(bold + 2));

    group.bench_function("bold_unwrap", |b| {
        b.iter(|| {
            let tr = compile(std::hint::black_box(&in_bold), &Cmd::ToggleBold);
            std::hint::black_box(tr.unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_keybindings, bench_toggles);
criterion_main!(benches);
