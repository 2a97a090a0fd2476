#![allow(non_snake_case)]

use super::xname::XName;

pub const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

pub mod W {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    pub fn body() -> XName { XName::new(NS, "body") }
    pub fn p() -> XName { XName::new(NS, "p") }
    pub fn pPr() -> XName { XName::new(NS, "pPr") }
    pub fn pStyle() -> XName { XName::new(NS, "pStyle") }
    pub fn r() -> XName { XName::new(NS, "r") }
    pub fn rPr() -> XName { XName::new(NS, "rPr") }
    pub fn rStyle() -> XName { XName::new(NS, "rStyle") }
    pub fn rFonts() -> XName { XName::new(NS, "rFonts") }
    pub fn t() -> XName { XName::new(NS, "t") }
    pub fn del() -> XName { XName::new(NS, "del") }
    pub fn delText() -> XName { XName::new(NS, "delText") }
    pub fn moveFrom() -> XName { XName::new(NS, "moveFrom") }
    pub fn tab() -> XName { XName::new(NS, "tab") }
    pub fn br() -> XName { XName::new(NS, "br") }
    pub fn b() -> XName { XName::new(NS, "b") }
    pub fn i() -> XName { XName::new(NS, "i") }
    pub fn sz() -> XName { XName::new(NS, "sz") }
    pub fn color() -> XName { XName::new(NS, "color") }
    pub fn jc() -> XName { XName::new(NS, "jc") }
    pub fn spacing() -> XName { XName::new(NS, "spacing") }
    pub fn tbl() -> XName { XName::new(NS, "tbl") }
    pub fn tblPr() -> XName { XName::new(NS, "tblPr") }
    pub fn tblStyle() -> XName { XName::new(NS, "tblStyle") }
    pub fn tblW() -> XName { XName::new(NS, "tblW") }
    pub fn tblGrid() -> XName { XName::new(NS, "tblGrid") }
    pub fn gridCol() -> XName { XName::new(NS, "gridCol") }
    pub fn tr() -> XName { XName::new(NS, "tr") }
    pub fn tc() -> XName { XName::new(NS, "tc") }
    pub fn sectPr() -> XName { XName::new(NS, "sectPr") }
    pub fn pgSz() -> XName { XName::new(NS, "pgSz") }
    pub fn pgMar() -> XName { XName::new(NS, "pgMar") }
    pub fn cols() -> XName { XName::new(NS, "cols") }
    pub fn pgNumType() -> XName { XName::new(NS, "pgNumType") }
    pub fn style() -> XName { XName::new(NS, "style") }
    pub fn styleId() -> XName { XName::new(NS, "styleId") }
    pub fn name() -> XName { XName::new(NS, "name") }
    pub fn comments() -> XName { XName::new(NS, "comments") }
    pub fn comment() -> XName { XName::new(NS, "comment") }
    pub fn commentRangeStart() -> XName { XName::new(NS, "commentRangeStart") }
    pub fn commentRangeEnd() -> XName { XName::new(NS, "commentRangeEnd") }
    pub fn commentReference() -> XName { XName::new(NS, "commentReference") }
    pub fn annotationRef() -> XName { XName::new(NS, "annotationRef") }
    pub fn id() -> XName { XName::new(NS, "id") }
    pub fn val() -> XName { XName::new(NS, "val") }
    pub fn author() -> XName { XName::new(NS, "author") }
    pub fn initials() -> XName { XName::new(NS, "initials") }
    pub fn date() -> XName { XName::new(NS, "date") }
    pub fn type_() -> XName { XName::new(NS, "type") }
    pub fn w() -> XName { XName::new(NS, "w") }
    pub fn h() -> XName { XName::new(NS, "h") }
    pub fn num() -> XName { XName::new(NS, "num") }
    pub fn fmt() -> XName { XName::new(NS, "fmt") }
    pub fn before() -> XName { XName::new(NS, "before") }
    pub fn after() -> XName { XName::new(NS, "after") }
    pub fn line() -> XName { XName::new(NS, "line") }
    pub fn lineRule() -> XName { XName::new(NS, "lineRule") }
    pub fn ascii() -> XName { XName::new(NS, "ascii") }
    pub fn hAnsi() -> XName { XName::new(NS, "hAnsi") }
    pub fn eastAsia() -> XName { XName::new(NS, "eastAsia") }
    pub fn top() -> XName { XName::new(NS, "top") }
    pub fn bottom() -> XName { XName::new(NS, "bottom") }
    pub fn left() -> XName { XName::new(NS, "left") }
    pub fn right() -> XName { XName::new(NS, "right") }
    pub fn header() -> XName { XName::new(NS, "header") }
    pub fn footer() -> XName { XName::new(NS, "footer") }
}

/// Package relationship parts (`*.rels`).
pub mod PR {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

    pub fn Relationship() -> XName { XName::new(NS, "Relationship") }
}

/// `[Content_Types].xml`.
pub mod CT {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

    pub fn Override() -> XName { XName::new(NS, "Override") }
}

pub mod CP {
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
}

pub mod DC {
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";
}

pub mod DCTERMS {
    pub const NS: &str = "http://purl.org/dc/terms/";
}
