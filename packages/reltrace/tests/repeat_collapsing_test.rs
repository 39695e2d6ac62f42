//! Tests for collapsing runs of identical frames into a summary line

use reltrace::{FormatOptions, FrameSummary, StackSummary, Verbatim, RECURSIVE_CUTOFF};

fn recursion(depth: usize) -> Vec<FrameSummary> {
    (0..depth)
        .map(|_| FrameSummary::new("/srv/app/fib.rs", 7, "fib::fib"))
        .collect()
}

fn render(frames: Vec<FrameSummary>, cutoff: usize) -> Vec<String> {
    frames
        .into_iter()
        .collect::<StackSummary>()
        .format(&Verbatim, cutoff)
}

const FIB_FRAME: &str = "  File \"/srv/app/fib.rs\", line 7, in fib::fib\n";

#[test]
fn test_default_cutoff_matches_convention() {
    assert_eq!(RECURSIVE_CUTOFF, 3);
    assert_eq!(FormatOptions::default().recursive_cutoff, RECURSIVE_CUTOFF);
}

#[test]
fn test_run_within_cutoff_prints_every_frame() {
    let lines = render(recursion(3), 3);

    assert_eq!(lines, [FIB_FRAME, FIB_FRAME, FIB_FRAME]);
}

#[test]
fn test_run_beyond_cutoff_is_summarized_once() {
    let mut frames = vec![FrameSummary::new("/srv/app/main.rs", 2, "main")];
    frames.extend(recursion(8));
    frames.push(FrameSummary::new("/srv/app/fib.rs", 3, "fib::base_case"));

    let lines = render(frames, 3);

    assert_eq!(
        lines,
        [
            "  File \"/srv/app/main.rs\", line 2, in main\n",
            FIB_FRAME,
            FIB_FRAME,
            FIB_FRAME,
            "  [Previous line repeated 5 more times]\n",
            "  File \"/srv/app/fib.rs\", line 3, in fib::base_case\n",
        ]
    );
}

#[test]
fn test_run_ending_the_stack_uses_singular_time() {
    let lines = render(recursion(4), 3);

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3], "  [Previous line repeated 1 more time]\n");
}

#[test]
fn test_frames_differing_only_in_line_are_not_merged() {
    let frames = (0..5)
        .map(|n| FrameSummary::new("/srv/app/fib.rs", 7 + n, "fib::fib"))
        .collect();

    let lines = render(frames, 3);

    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|line| !line.contains("Previous line")));
}

#[test]
fn test_source_lines_are_suppressed_with_their_frames() {
    let frames = (0..5)
        .map(|_| FrameSummary::new("/srv/app/fib.rs", 7, "fib::fib").with_line("fib(n - 1)"))
        .collect();

    let lines = render(frames, 1);

    assert_eq!(
        lines,
        [
            FIB_FRAME,
            "    fib(n - 1)\n",
            "  [Previous line repeated 4 more times]\n",
        ]
    );
}
