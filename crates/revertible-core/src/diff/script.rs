//! Minimal edit scripts over element slices.
//!
//! Myers' greedy O((N+M)D) algorithm with common prefix/suffix stripping,
//! shared by the string and byte-buffer differs. Output is a run-length
//! encoded script in source order: `Keep` consumes one element from both
//! sides, `Remove` from the source only, `Insert` from the destination
//! only.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditKind {
    Keep,
    Remove,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EditRun {
    pub kind: EditKind,
    pub len: usize,
}

/// Minimal edit script transforming `src` into `dst`.
pub(crate) fn edit_script<T: PartialEq>(src: &[T], dst: &[T]) -> Vec<EditRun> {
    let mut prefix = 0usize;
    let max_prefix = src.len().min(dst.len());
    while prefix < max_prefix && src[prefix] == dst[prefix] {
        prefix += 1;
    }

    let mut suffix = 0usize;
    let max_suffix = src.len().min(dst.len()) - prefix;
    while suffix < max_suffix && src[src.len() - 1 - suffix] == dst[dst.len() - 1 - suffix] {
        suffix += 1;
    }

    let middle_src = &src[prefix..src.len() - suffix];
    let middle_dst = &dst[prefix..dst.len() - suffix];

    let mut runs = Vec::new();
    if prefix > 0 {
        runs.push(EditRun {
            kind: EditKind::Keep,
            len: prefix,
        });
    }
    myers(middle_src, middle_dst, &mut runs);
    if suffix > 0 {
        push_run(&mut runs, EditKind::Keep, suffix);
    }
    runs
}

fn push_run(runs: &mut Vec<EditRun>, kind: EditKind, len: usize) {
    if len == 0 {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if last.kind == kind {
            last.len += len;
            return;
        }
    }
    runs.push(EditRun { kind, len });
}

fn myers<T: PartialEq>(a: &[T], b: &[T], runs: &mut Vec<EditRun>) {
    let n = a.len();
    let m = b.len();
    if n == 0 {
        push_run(runs, EditKind::Insert, m);
        return;
    }
    if m == 0 {
        push_run(runs, EditKind::Remove, n);
        return;
    }

    let max = n + m;
    let offset = max as isize;
    let mut v = vec![0isize; 2 * max + 1];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'search: for d in 0..=(max as isize) {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let idx = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;
            debug_assert!(x >= 0 && y >= 0);
            while (x as usize) < n && (y as usize) < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx] = x;
            if x as usize >= n && y as usize >= m {
                break 'search;
            }
            k += 2;
        }
    }

    // Backtrack through the recorded V snapshots, collecting edits in
    // reverse.
    let mut reversed: Vec<EditKind> = Vec::with_capacity(max);
    let mut x = n as isize;
    let mut y = m as isize;
    for d in (0..trace.len()).rev() {
        let v = &trace[d];
        let d = d as isize;
        let k = x - y;
        let idx = (k + offset) as usize;
        let prev_k = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v[(prev_k + offset) as usize];
        let prev_y = prev_x - prev_k;
        while x > prev_x && y > prev_y {
            reversed.push(EditKind::Keep);
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            reversed.push(if x == prev_x {
                EditKind::Insert
            } else {
                EditKind::Remove
            });
            x = prev_x;
            y = prev_y;
        }
    }

    for kind in reversed.into_iter().rev() {
        push_run(runs, kind, 1);
    }
}

// ── Positional sequence edits ─────────────────────────────────────────────

/// The two reverse patches for a positional sequence, derived from a
/// minimal edit script between `current` (source) and `previous`
/// (destination).
pub(crate) struct SequenceEdits<T> {
    /// Half-open ranges into the current value, ascending. Applied in
    /// descending order so earlier removals never invalidate later indices.
    pub removals: Vec<Range<usize>>,
    /// `(position in the previous value, run of elements)`, ascending.
    /// Applied in ascending order against a buffer already reduced to the
    /// previous value's remaining shape.
    pub insertions: Vec<(usize, Vec<T>)>,
}

pub(crate) fn sequence_edits<T: PartialEq + Clone>(
    current: &[T],
    previous: &[T],
) -> SequenceEdits<T> {
    let script = edit_script(current, previous);
    let mut removals = Vec::new();
    let mut insertions = Vec::new();
    let mut cur_pos = 0usize;
    let mut prev_pos = 0usize;
    for run in script {
        match run.kind {
            EditKind::Keep => {
                cur_pos += run.len;
                prev_pos += run.len;
            }
            EditKind::Remove => {
                removals.push(cur_pos..cur_pos + run.len);
                cur_pos += run.len;
            }
            EditKind::Insert => {
                insertions.push((prev_pos, previous[prev_pos..prev_pos + run.len].to_vec()));
                prev_pos += run.len;
            }
        }
    }
    SequenceEdits {
        removals,
        insertions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(src: &[u8], dst: &[u8]) -> Vec<u8> {
        let script = edit_script(src, dst);
        let mut out = Vec::new();
        let mut si = 0usize;
        let mut di = 0usize;
        for run in &script {
            match run.kind {
                EditKind::Keep => {
                    out.extend_from_slice(&src[si..si + run.len]);
                    si += run.len;
                    di += run.len;
                }
                EditKind::Remove => si += run.len,
                EditKind::Insert => {
                    out.extend_from_slice(&dst[di..di + run.len]);
                    di += run.len;
                }
            }
        }
        assert_eq!(si, src.len());
        assert_eq!(di, dst.len());
        out
    }

    fn edit_distance(src: &[u8], dst: &[u8]) -> usize {
        edit_script(src, dst)
            .iter()
            .filter(|r| r.kind != EditKind::Keep)
            .map(|r| r.len)
            .sum()
    }

    #[test]
    fn identical_inputs_keep_everything() {
        let script = edit_script(b"abc", b"abc");
        assert_eq!(
            script,
            vec![EditRun {
                kind: EditKind::Keep,
                len: 3
            }]
        );
    }

    #[test]
    fn script_replays_to_destination() {
        let cases: &[(&[u8], &[u8])] = &[
            (b"abcabba", b"cbabac"),
            (b"", b"abc"),
            (b"abc", b""),
            (b"zaybecd", b"abcd"),
            (b"kitten", b"sitting"),
            (b"aaaa", b"aaba"),
        ];
        for (src, dst) in cases {
            assert_eq!(replay(src, dst), dst.to_vec(), "src={src:?} dst={dst:?}");
        }
    }

    #[test]
    fn script_is_minimal() {
        // Classic Myers example: distance 5.
        assert_eq!(edit_distance(b"abcabba", b"cbabac"), 5);
        // Pure insertions.
        assert_eq!(edit_distance(b"abcd", b"zaybecd"), 3);
        assert_eq!(edit_distance(b"kitten", b"sitting"), 5);
    }

    #[test]
    fn sequence_edits_restore_previous() {
        let current = b"zaybecd".to_vec();
        let previous = b"abcd".to_vec();
        let edits = sequence_edits(&current, &previous);

        let mut buf = current.clone();
        for range in edits.removals.iter().rev() {
            buf.drain(range.clone());
        }
        for (pos, chunk) in &edits.insertions {
            for (i, byte) in chunk.iter().enumerate() {
                buf.insert(pos + i, *byte);
            }
        }
        assert_eq!(buf, previous);
    }
}
