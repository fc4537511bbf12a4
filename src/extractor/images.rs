use scraper::ElementRef;
use url::Url;

const LAZY_SOURCE_ATTRS: &[&str] = &["data-lazy-src", "data-src"];
const SRCSET_ATTRS: &[&str] = &["data-lazy-srcset", "data-srcset", "srcset"];
const MIN_DIMENSION: u32 = 30;
const SKIPPED_HOSTS: &[&str] = &["gravatar.com"];

/// Best absolute URL for an `<img>`, or `None` for spacers, avatars, inline
/// data and anything too small to be content.
pub fn image_url(img: ElementRef<'_>, base: &Url) -> Option<String> {
    if is_tiny(img) {
        return None;
    }

    let raw = LAZY_SOURCE_ATTRS
        .iter()
        .find_map(|attr| non_empty_attr(img, attr))
        .or_else(|| largest_srcset_candidate(img))
        .or_else(|| non_empty_attr(img, "src"))?;

    if raw.starts_with("data:") {
        return None;
    }

    let resolved = base.join(raw).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    if let Some(host) = resolved.host_str()
        && SKIPPED_HOSTS.iter().any(|skipped| host.ends_with(skipped))
    {
        return None;
    }

    // `]` would terminate the `[image: ...]` marker early
    Some(resolved.as_str().replace(']', "%5D"))
}

fn non_empty_attr<'a>(img: ElementRef<'a>, attr: &str) -> Option<&'a str> {
    img.value()
        .attr(attr)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn largest_srcset_candidate<'a>(img: ElementRef<'a>) -> Option<&'a str> {
    let srcset = SRCSET_ATTRS.iter().find_map(|attr| non_empty_attr(img, attr))?;

    let mut best: Option<(&str, u32)> = None;
    for candidate in srcset.split(',') {
        let mut pieces = candidate.split_whitespace();
        let Some(url) = pieces.next() else { continue };
        let width = pieces
            .next()
            .and_then(|descriptor| descriptor.strip_suffix('w'))
            .and_then(|w| w.parse::<u32>().ok())
            .unwrap_or(0);
        if best.is_none_or(|(_, top)| width > top) {
            best = Some((url, width));
        }
    }
    best.map(|(url, _)| url)
}

fn is_tiny(img: ElementRef<'_>) -> bool {
    ["width", "height"].iter().any(|attr| {
        img.value()
            .attr(attr)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .is_some_and(|px| px <= MIN_DIMENSION)
    })
}
