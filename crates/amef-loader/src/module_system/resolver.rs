// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Relative path resolution for module specifiers
//!
//! Paths are plain `/`-separated strings; nothing here touches a filesystem.

/// Resolve `target` against the module path `referrer`.
///
/// The referrer's own file name is dropped, leading `.` segments of the
/// referrer are ignored, and each `.` or `..` segment of the target is
/// applied in order. `..` on an empty path is a no-op.
pub fn resolve_path(referrer: &str, target: &str) -> String {
    let mut segments: Vec<&str> = referrer
        .split('/')
        .skip_while(|segment| *segment == ".")
        .collect();
    segments.pop();

    for segment in target.split('/') {
        match segment {
            "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    segments.join("/")
}

/// The final dot-delimited segment of a path, used to pick a loader.
pub fn suffix_of(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
