use super::NOTDEF;
use prescript::{Encoding, NameRegistry};

pub fn standard(name_register: &mut NameRegistry) -> Encoding {
    Encoding::from(
        name_register,
        [
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "space",
            "exclam",
            "quotedbl",
            "numbersign",
            "dollar",
            "percent",
            "ampersand",
            "quoteright",
            "parenleft",
            "parenright",
            "asterisk",
            "plus",
            "comma",
            "hyphen",
            "period",
            "slash",
            "zero",
            "one",
            "two",
            "three",
            "four",
            "five",
            "six",
            "seven",
            "eight",
            "nine",
            "colon",
            "semicolon",
            "less",
            "equal",
            "greater",
            "question",
            "at",
            "A",
            "B",
            "C",
            "D",
            "E",
            "F",
            "G",
            "H",
            "I",
            "J",
            "K",
            "L",
            "M",
            "N",
            "O",
            "P",
            "Q",
            "R",
            "S",
            "T",
            "U",
            "V",
            "W",
            "X",
            "Y",
            "Z",
            "bracketleft",
            "backslash",
            "bracketright",
            "asciicircum",
            "underscore",
            "quoteleft",
            "a",
            "b",
            "c",
            "d",
            "e",
            "f",
            "g",
            "h",
            "i",
            "j",
            "k",
            "l",
            "m",
            "n",
            "o",
            "p",
            "q",
            "r",
            "s",
            "t",
            "u",
            "v",
            "w",
            "x",
            "y",
            "z",
            "braceleft",
            "bar",
            "braceright",
            "asciitilde",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "exclamdown",
            "cent",
            "sterling",
            "fraction",
            "yen",
            "florin",
            "section",
            "currency",
            "quotesingle",
            "quotedblleft",
            "guillemotleft",
            "guilsinglleft",
            "guilsinglright",
            "fi",
            "fl",
            NOTDEF,
            "endash",
            "dagger",
            "daggerdbl",
            "periodcentered",
            NOTDEF,
            "paragraph",
            "bullet",
            "quotesinglbase",
            "quotedblbase",
            "quotedblright",
            "guillemotright",
            "ellipsis",
            "perthousand",
            NOTDEF,
            "questiondown",
            NOTDEF,
            "grave",
            "acute",
            "circumflex",
            "tilde",
            "macron",
            "breve",
            "dotaccent",
            "dieresis",
            NOTDEF,
            "ring",
            "cedilla",
            NOTDEF,
            "hungarumlaut",
            "ogonek",
            "caron",
            "emdash",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "AE",
            NOTDEF,
            "ordfeminine",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "Lslash",
            "Oslash",
            "OE",
            "ordmasculine",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "ae",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "dotlessi",
            NOTDEF,
            NOTDEF,
            "lslash",
            "oslash",
            "oe",
            "germandbls",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
        ],
    )
}

pub fn expert(name_register: &mut NameRegistry) -> Encoding {
    Encoding::from(
        name_register,
        [
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "space",
            "exclamsmall",
            "Hungarumlautsmall",
            NOTDEF,
            "dollaroldstyle",
            "dollarsuperior",
            "ampersandsmall",
            "Acutesmall",
            "parenleftsuperior",
            "parenrightsuperior",
            "twodotenleader",
            "onedotenleader",
            "comma",
            "hyphen",
            "period",
            "fraction",
            "zerooldstyle",
            "oneoldstyle",
            "twooldstyle",
            "threeoldstyle",
            "fouroldstyle",
            "fiveoldstyle",
            "sixoldstyle",
            "sevenoldstyle",
            "eightoldstyle",
            "nineoldstyle",
            "colon",
            "semicolon",
            "commasuperior",
            "threequartersemdash",
            "periodsuperior",
            "questionsmall",
            NOTDEF,
            "asuperior",
            "bsuperior",
            "centsuperior",
            "dsuperior",
            "esuperior",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "isuperior",
            NOTDEF,
            NOTDEF,
            "lsuperior",
            "msuperior",
            "nsuperior",
            "osuperior",
            NOTDEF,
            NOTDEF,
            "rsuperior",
            "ssuperior",
            "tsuperior",
            NOTDEF,
            "ff",
            "fi",
            "fl",
            "ffi",
            "ffl",
            "parenleftinferior",
            NOTDEF,
            "parenrightinferior",
            "Circumflexsmall",
            "hyphensuperior",
            "Gravesmall",
            "Asmall",
            "Bsmall",
            "Csmall",
            "Dsmall",
            "Esmall",
            "Fsmall",
            "Gsmall",
            "Hsmall",
            "Ismall",
            "Jsmall",
            "Ksmall",
            "Lsmall",
            "Msmall",
            "Nsmall",
            "Osmall",
            "Psmall",
            "Qsmall",
            "Rsmall",
            "Ssmall",
            "Tsmall",
            "Usmall",
            "Vsmall",
            "Wsmall",
            "Xsmall",
            "Ysmall",
            "Zsmall",
            "colonmonetary",
            "onefitted",
            "rupiah",
            "Tildesmall",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "exclamdownsmall",
            "centoldstyle",
            "Lslashsmall",
            NOTDEF,
            NOTDEF,
            "Scaronsmall",
            "Zcaronsmall",
            "Dieresissmall",
            "Brevesmall",
            "Caronsmall",
            NOTDEF,
            "Dotaccentsmall",
            NOTDEF,
            NOTDEF,
            "Macronsmall",
            NOTDEF,
            NOTDEF,
            "figuredash",
            "hypheninferior",
            NOTDEF,
            NOTDEF,
            "Ogoneksmall",
            "Ringsmall",
            "Cedillasmall",
            NOTDEF,
            NOTDEF,
            NOTDEF,
            "onequarter",
            "onehalf",
            "threequarters",
            "questiondownsmall",
            "oneeighth",
            "threeeighths",
            "fiveeighths",
            "seveneighths",
            "onethird",
            "twothirds",
            NOTDEF,
            NOTDEF,
            "zerosuperior",
            "onesuperior",
            "twosuperior",
            "threesuperior",
            "foursuperior",
            "fivesuperior",
            "sixsuperior",
            "sevensuperior",
            "eightsuperior",
            "ninesuperior",
            "zeroinferior",
            "oneinferior",
            "twoinferior",
            "threeinferior",
            "fourinferior",
            "fiveinferior",
            "sixinferior",
            "seveninferior",
            "eightinferior",
            "nineinferior",
            "centinferior",
            "dollarinferior",
            "periodinferior",
            "commainferior",
            "Agravesmall",
            "Aacutesmall",
            "Acircumflexsmall",
            "Atildesmall",
            "Adieresissmall",
            "Aringsmall",
            "AEsmall",
            "Ccedillasmall",
            "Egravesmall",
            "Eacutesmall",
            "Ecircumflexsmall",
            "Edieresissmall",
            "Igravesmall",
            "Iacutesmall",
            "Icircumflexsmall",
            "Idieresissmall",
            "Ethsmall",
            "Ntildesmall",
            "Ogravesmall",
            "Oacutesmall",
            "Ocircumflexsmall",
            "Otildesmall",
            "Odieresissmall",
            "OEsmall",
            "Oslashsmall",
            "Ugravesmall",
            "Uacutesmall",
            "Ucircumflexsmall",
            "Udieresissmall",
            "Yacutesmall",
            "Thornsmall",
            "Ydieresissmall",
        ],
    )
}
