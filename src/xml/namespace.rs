//! XML namespaces used in OOXML

/// WordprocessingML main namespace
pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Relationships namespace (the `r:` prefix inside parts)
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Drawing namespace
pub const WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
/// Word 2010 extensions (carries `w14:paraId`)
pub const W14: &str = "http://schemas.microsoft.com/office/word/2010/wordml";
/// Markup compatibility namespace
pub const MC: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
/// Content Types namespace
pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
/// Package Relationships namespace
pub const PR: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Full namespace-prefix set Word declares on header and footer roots
pub fn header_footer_namespaces() -> Vec<(&'static str, &'static str)> {
    vec![
        ("xmlns:wpc", "http://schemas.microsoft.com/office/word/2010/wordprocessingCanvas"),
        ("xmlns:cx", "http://schemas.microsoft.com/office/drawing/2014/chartex"),
        ("xmlns:cx1", "http://schemas.microsoft.com/office/drawing/2015/9/8/chartex"),
        ("xmlns:cx2", "http://schemas.microsoft.com/office/drawing/2015/10/21/chartex"),
        ("xmlns:cx3", "http://schemas.microsoft.com/office/drawing/2016/5/9/chartex"),
        ("xmlns:cx4", "http://schemas.microsoft.com/office/drawing/2016/5/10/chartex"),
        ("xmlns:cx5", "http://schemas.microsoft.com/office/drawing/2016/5/11/chartex"),
        ("xmlns:cx6", "http://schemas.microsoft.com/office/drawing/2016/5/12/chartex"),
        ("xmlns:cx7", "http://schemas.microsoft.com/office/drawing/2016/5/13/chartex"),
        ("xmlns:cx8", "http://schemas.microsoft.com/office/drawing/2016/5/14/chartex"),
        ("xmlns:mc", MC),
        ("xmlns:aink", "http://schemas.microsoft.com/office/drawing/2016/ink"),
        ("xmlns:am3d", "http://schemas.microsoft.com/office/drawing/2017/model3d"),
        ("xmlns:o", "urn:schemas-microsoft-com:office:office"),
        ("xmlns:oel", "http://schemas.microsoft.com/office/2019/extlst"),
        ("xmlns:r", R),
        ("xmlns:m", "http://schemas.openxmlformats.org/officeDocument/2006/math"),
        ("xmlns:v", "urn:schemas-microsoft-com:vml"),
        ("xmlns:wp14", "http://schemas.microsoft.com/office/word/2010/wordprocessingDrawing"),
        ("xmlns:wp", WP),
        ("xmlns:w10", "urn:schemas-microsoft-com:office:word"),
        ("xmlns:w", W),
        ("xmlns:w14", W14),
        ("xmlns:w15", "http://schemas.microsoft.com/office/word/2012/wordml"),
        ("xmlns:w16cex", "http://schemas.microsoft.com/office/word/2018/wordml/cex"),
        ("xmlns:w16cid", "http://schemas.microsoft.com/office/word/2016/wordml/cid"),
        ("xmlns:w16", "http://schemas.microsoft.com/office/word/2018/wordml"),
        ("xmlns:w16sdtdh", "http://schemas.microsoft.com/office/word/2020/wordml/sdtdatahash"),
        ("xmlns:w16se", "http://schemas.microsoft.com/office/word/2015/wordml/symex"),
        ("xmlns:wpg", "http://schemas.microsoft.com/office/word/2010/wordprocessingGroup"),
        ("xmlns:wpi", "http://schemas.microsoft.com/office/word/2010/wordprocessingInk"),
        ("xmlns:wne", "http://schemas.microsoft.com/office/word/2006/wordml"),
        ("xmlns:wps", "http://schemas.microsoft.com/office/word/2010/wordprocessingShape"),
    ]
}

/// Value of `mc:Ignorable` matching [`header_footer_namespaces`]
pub const HEADER_FOOTER_IGNORABLE: &str = "w14 w15 w16se w16cid w16 w16cex w16sdtdh wp14";
