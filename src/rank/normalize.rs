use crate::tsvector::TsVector;

/// Normalization options for rank scores, combinable as a bit-mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// 0 (default) - no normalization
    None = 0x00,
    /// 1 - divides by log2(document length + 1)
    LogLength = 0x01,
    /// 2 - divides by document length
    Length = 0x02,
    /// 4 - divides by the mean distance between extents (cover-density only)
    ExtentDist = 0x04,
    /// 8 - divides by unique word count
    Uniq = 0x08,
    /// 16 - divides by log2(unique word count + 1)
    LogUniq = 0x10,
    /// 32 - maps the score into [0, 1) as r / (r + 1)
    RDivRPlus1 = 0x20,
}

/// Extent bookkeeping produced by the cover scan, consumed by
/// [`Normalization::ExtentDist`].
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ExtentStats {
    pub n_extent: usize,
    pub sum_dist: f64,
}

/// Applies every normalization bit set in `method`, in mask order. The
/// extent division only fires for cover-density scores, which are the only
/// callers passing extent stats.
pub(crate) fn apply(
    method: u32,
    mut res: f64,
    vector: &TsVector,
    extents: Option<&ExtentStats>,
) -> f64 {
    let uniq = vector.size();

    if method & (Normalization::LogLength as u32) != 0 && uniq > 0 {
        res /= ((vector.length() + 1) as f64).log2();
    }

    if method & (Normalization::Length as u32) != 0 {
        let len = vector.length();
        if len > 0 {
            res /= len as f64;
        }
    }

    if method & (Normalization::ExtentDist as u32) != 0 {
        if let Some(ext) = extents {
            if ext.n_extent > 0 && ext.sum_dist > 0.0 {
                res /= ext.n_extent as f64 / ext.sum_dist;
            }
        }
    }

    if method & (Normalization::Uniq as u32) != 0 && uniq > 0 {
        res /= uniq as f64;
    }

    if method & (Normalization::LogUniq as u32) != 0 && uniq > 0 {
        res /= ((uniq + 1) as f64).log2();
    }

    if method & (Normalization::RDivRPlus1 as u32) != 0 {
        res /= res + 1.0;
    }

    res
}
